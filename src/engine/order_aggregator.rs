// ==========================================
// 烘焙生产排盘系统 - 订单聚合引擎
// ==========================================
// 职责: 将订单行按 (目的地组, 产品) 汇总为需求量
// 红线: FROZEN 发运的订单行整行剔除,不占用任何托盘
// 性质: 结果与订单行顺序无关
// ==========================================

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::domain::order::OrderLine;
use crate::domain::types::DestinationRef;

// ==========================================
// OrderDemand - 聚合需求
// ==========================================
// 目的地组 -> 产品ID -> 数量
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDemand {
    by_destination: BTreeMap<DestinationRef, BTreeMap<String, u64>>,
}

impl OrderDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加需求
    pub fn add(&mut self, destination: DestinationRef, product_id: &str, quantity: u64) {
        if quantity == 0 {
            return;
        }
        let entry = self
            .by_destination
            .entry(destination)
            .or_default()
            .entry(product_id.to_string())
            .or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// 指定目的地组、产品的需求量
    pub fn quantity(&self, destination: &DestinationRef, product_id: &str) -> u64 {
        self.by_destination
            .get(destination)
            .and_then(|m| m.get(product_id))
            .copied()
            .unwrap_or(0)
    }

    /// 目的地组的产品需求
    pub fn for_destination(&self, destination: &DestinationRef) -> Option<&BTreeMap<String, u64>> {
        self.by_destination.get(destination)
    }

    /// 目的地组总需求
    pub fn destination_total(&self, destination: &DestinationRef) -> u64 {
        self.by_destination
            .get(destination)
            .map(|m| m.values().fold(0u64, |acc, q| acc.saturating_add(*q)))
            .unwrap_or(0)
    }

    /// 有需求的目的地组
    pub fn destinations(&self) -> impl Iterator<Item = &DestinationRef> {
        self.by_destination.keys()
    }

    pub fn has_demand(&self, destination: &DestinationRef) -> bool {
        self.destination_total(destination) > 0
    }

    /// 全部目的地组合计的产品需求
    pub fn product_totals(&self) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        for products in self.by_destination.values() {
            for (product_id, qty) in products {
                let total = totals.entry(product_id.clone()).or_insert(0u64);
                *total = total.saturating_add(*qty);
            }
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.by_destination.is_empty()
    }

    /// 将不在已知目的地组集合中的需求并入 Unassigned
    ///
    /// # 返回
    /// 被并入的目的地组数量
    pub fn reroute_unknown_destinations(&mut self, known_ids: &HashSet<&str>) -> usize {
        let unknown: Vec<DestinationRef> = self
            .by_destination
            .keys()
            .filter(|d| match d {
                DestinationRef::Assigned(id) => !known_ids.contains(id.as_str()),
                DestinationRef::Unassigned => false,
            })
            .cloned()
            .collect();

        for destination in &unknown {
            if let Some(products) = self.by_destination.remove(destination) {
                warn!(
                    destination_group_id = %destination,
                    "目的地组不存在或已停用，需求并入未分配组"
                );
                for (product_id, qty) in products {
                    self.add(DestinationRef::Unassigned, &product_id, qty);
                }
            }
        }
        unknown.len()
    }

    /// 只保留满足条件的产品需求
    ///
    /// # 返回
    /// 被剔除的 (目的地组, 产品ID, 数量)
    pub fn retain_products<F>(&mut self, keep: F) -> Vec<(DestinationRef, String, u64)>
    where
        F: Fn(&str) -> bool,
    {
        let mut removed = Vec::new();
        for (destination, products) in self.by_destination.iter_mut() {
            products.retain(|product_id, qty| {
                if keep(product_id.as_str()) {
                    true
                } else {
                    removed.push((destination.clone(), product_id.clone(), *qty));
                    false
                }
            });
        }
        self.drop_empty_destinations();
        removed
    }

    /// 剔除总需求为 0 的目的地组
    pub fn drop_empty_destinations(&mut self) {
        self.by_destination.retain(|_, products| {
            products.retain(|_, qty| *qty > 0);
            !products.is_empty()
        });
    }
}

// ==========================================
// OrderAggregator - 订单聚合引擎
// ==========================================
pub struct OrderAggregator {
    // 无状态引擎
}

impl OrderAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合订单行
    ///
    /// 跳过规则：
    /// - ship_state = frozen
    /// - 订单状态不是 confirmed / locked
    /// - 数量 <= 0
    pub fn aggregate(&self, lines: &[OrderLine]) -> OrderDemand {
        let mut demand = OrderDemand::new();
        let mut frozen_lines = 0usize;
        let mut ignored_lines = 0usize;

        for line in lines {
            if line.ship_state.is_frozen() {
                frozen_lines += 1;
                continue;
            }
            if !line.order_status.is_plannable() {
                ignored_lines += 1;
                continue;
            }
            if line.quantity <= 0 {
                warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "订单行数量非正，已忽略"
                );
                ignored_lines += 1;
                continue;
            }
            demand.add(line.destination.clone(), &line.product_id, line.quantity as u64);
        }

        demand.drop_empty_destinations();

        debug!(
            total_lines = lines.len(),
            frozen_lines,
            ignored_lines,
            destination_groups = demand.by_destination.len(),
            "订单聚合完成"
        );

        demand
    }
}

impl Default for OrderAggregator {
    fn default() -> Self {
        Self::new()
    }
}
