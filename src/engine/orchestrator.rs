// ==========================================
// 烘焙生产排盘系统 - 引擎编排器
// ==========================================
// 流程: 订单聚合 -> 目的地组排序 -> 托盘分配 -> 网格投影 -> 文档组装
// 红线: 单线程、同步、单次遍历;不持有跨请求状态
// ==========================================

use std::collections::HashSet;
use tracing::{info, instrument, warn};

use crate::config::planner_config::PlannerConfig;
use crate::domain::plan::ProductionPlan;
use crate::domain::snapshot::PlanningSnapshot;
use crate::engine::allocation::AllocationEngine;
use crate::engine::capacity_resolver::CapacityResolver;
use crate::engine::catalog::ProductCatalog;
use crate::engine::destinations::{is_reserved_id, order_destinations};
use crate::engine::grid_projector::GridProjector;
use crate::engine::order_aggregator::OrderAggregator;
use crate::engine::plan_assembler::PlanAssembler;

// ==========================================
// ProductionPlanOrchestrator - 引擎编排器
// ==========================================
pub struct ProductionPlanOrchestrator {
    config: PlannerConfig,
    aggregator: OrderAggregator,
    allocator: AllocationEngine,
    projector: GridProjector,
    assembler: PlanAssembler,
}

impl ProductionPlanOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - config: 本次请求已读取的排盘配置
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            allocator: AllocationEngine::new(CapacityResolver::new(config.fallback_capacity)),
            aggregator: OrderAggregator::new(),
            projector: GridProjector::new(),
            assembler: PlanAssembler::new(),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 对一个交货日期的快照执行完整排盘
    ///
    /// 相同快照多次执行得到完全相同的结果（含托盘编号）。
    #[instrument(skip(self, snapshot), fields(
        delivery_date = %snapshot.delivery_date,
        destination_groups = snapshot.destination_groups.len(),
        products = snapshot.products.len(),
        order_lines = snapshot.order_lines.len()
    ))]
    pub fn execute(&self, snapshot: &PlanningSnapshot) -> ProductionPlan {
        // 1. 订单聚合
        let mut demand = self.aggregator.aggregate(&snapshot.order_lines);

        // 2. 不存在/已停用/占用保留ID的目的地组需求并入未分配组
        let active_ids: HashSet<&str> = snapshot
            .destination_groups
            .iter()
            .filter(|g| g.is_active && !is_reserved_id(&g.id))
            .map(|g| g.id.as_str())
            .collect();
        demand.reroute_unknown_destinations(&active_ids);

        // 3. 产品目录
        let catalog = ProductCatalog::build(
            &snapshot.bake_groups,
            &snapshot.products,
            &snapshot.equipment_types,
            &self.config.default_prep_method,
        );

        // 4. 无法排盘的产品需求（产品不存在 / 烘焙组不存在）
        let unplaceable = demand.retain_products(|product_id| catalog.is_plannable(product_id));
        for (destination, product_id, qty) in &unplaceable {
            warn!(
                destination_group_id = %destination,
                product_id = %product_id,
                qty,
                "产品不存在或烘焙组不可解析，需求未排盘"
            );
        }

        // 5. 目的地组排序
        let destinations =
            order_destinations(&snapshot.destination_groups, &demand, &self.config);

        // 6. 托盘分配
        let allocation = self.allocator.allocate(&destinations, &catalog, &demand);

        // 7. 网格投影
        let tray_grid = self.projector.project(&allocation.tray_assignments, &catalog);

        info!(
            total_trays = allocation.total_trays,
            planned_groups = allocation.destination_plans.len(),
            unplaceable_lines = unplaceable.len(),
            "排盘完成"
        );

        // 8. 文档组装
        self.assembler
            .assemble(snapshot.delivery_date, allocation, tray_grid)
    }
}

impl Default for ProductionPlanOrchestrator {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
