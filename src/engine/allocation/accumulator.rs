// ==========================================
// 烘焙生产排盘系统 - 托盘累加器状态机
// ==========================================
// 状态: Empty / Accumulating(capacity, used, items)
// 封盘触发: 容量变化 / 装满 / 烘焙组结束 / 目的地组结束
// ==========================================

use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::bake_group::BakeGroup;
use crate::domain::plan::{EquipmentUnit, TrayItem};
use crate::domain::product::Product;

/// 封盘触发条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// 下一个产品的容量与当前托盘不同
    CapacityChanged { next_capacity: u32 },
    /// 当前托盘已装满
    CapacityReached,
    /// 烘焙组内产品处理完毕
    EndOfBakeGroup,
    /// 目的地组处理完毕
    EndOfDestinationGroup,
}

/// 正在装载、尚未封盘的托盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTray {
    pub bake_group_id: String,
    pub bake_group_name: String,
    pub capacity: u32,
    pub used: u32,
    pub items: Vec<TrayItem>,
}

impl OpenTray {
    pub fn space(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }
}

// ==========================================
// TrayAccumulator - 托盘累加器
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrayAccumulator {
    #[default]
    Empty,
    Accumulating(OpenTray),
}

impl TrayAccumulator {
    pub fn is_empty(&self) -> bool {
        matches!(self, TrayAccumulator::Empty)
    }

    /// 判断给定触发条件下是否需要封盘
    ///
    /// 空累加器在任何条件下都不封盘。
    pub fn should_flush(&self, trigger: FlushTrigger) -> bool {
        let open = match self {
            TrayAccumulator::Empty => return false,
            TrayAccumulator::Accumulating(open) => open,
        };
        match trigger {
            FlushTrigger::CapacityChanged { next_capacity } => open.capacity != next_capacity,
            FlushTrigger::CapacityReached => open.used >= open.capacity,
            FlushTrigger::EndOfBakeGroup | FlushTrigger::EndOfDestinationGroup => true,
        }
    }

    /// 向当前托盘放入产品（空时先开新托盘）
    ///
    /// # 返回
    /// 实际放入数量 = min(剩余空间, 剩余需求)
    pub fn place(
        &mut self,
        bake_group: &BakeGroup,
        capacity: u32,
        product: &Product,
        remaining: u64,
    ) -> u32 {
        if self.is_empty() {
            *self = TrayAccumulator::Accumulating(OpenTray {
                bake_group_id: bake_group.id.clone(),
                bake_group_name: bake_group.name.clone(),
                capacity,
                used: 0,
                items: Vec::new(),
            });
        }

        let open = match self {
            TrayAccumulator::Accumulating(open) => open,
            TrayAccumulator::Empty => return 0,
        };

        let placed = u64::from(open.space()).min(remaining) as u32;
        if placed == 0 {
            return 0;
        }
        open.items.push(TrayItem {
            product: product.name.clone(),
            product_id: product.id.clone(),
            qty: placed,
        });
        open.used += placed;
        placed
    }

    /// 取出当前托盘并回到 Empty
    pub fn take(&mut self) -> Option<OpenTray> {
        match std::mem::take(self) {
            TrayAccumulator::Empty => None,
            TrayAccumulator::Accumulating(open) => Some(open),
        }
    }
}

// ==========================================
// AllocationState - 单次分配的可变状态
// ==========================================
// 全局托盘号: 整个排盘从 1 开始,不重置
// 局部托盘号: 每个目的地组从 1 开始
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationState {
    next_global: u32,
    next_local: u32,
    accumulator: TrayAccumulator,
    sealed: Vec<EquipmentUnit>,
    assignments: BTreeMap<String, BTreeMap<u32, u32>>,
}

impl AllocationState {
    pub fn new() -> Self {
        Self {
            next_global: 1,
            next_local: 1,
            accumulator: TrayAccumulator::Empty,
            sealed: Vec::new(),
            assignments: BTreeMap::new(),
        }
    }

    /// 下一个封盘托盘将获得的全局托盘号
    pub fn next_global(&self) -> u32 {
        self.next_global
    }

    pub fn next_local(&self) -> u32 {
        self.next_local
    }

    pub fn accumulator(&self) -> &TrayAccumulator {
        &self.accumulator
    }

    /// 开始新的目的地组：局部托盘号归 1
    pub fn begin_destination(&mut self) {
        self.next_local = 1;
    }

    /// 放入产品,并同步记录产品→托盘分配
    pub fn place(
        &mut self,
        bake_group: &BakeGroup,
        capacity: u32,
        product: &Product,
        remaining: u64,
    ) -> u32 {
        let placed = self.accumulator.place(bake_group, capacity, product, remaining);
        if placed > 0 {
            *self
                .assignments
                .entry(product.id.clone())
                .or_default()
                .entry(self.next_global)
                .or_insert(0) += placed;
        }
        placed
    }

    /// 满足触发条件时封盘
    ///
    /// # 返回
    /// 是否发生封盘
    pub fn flush_if(&mut self, trigger: FlushTrigger) -> bool {
        if !self.accumulator.should_flush(trigger) {
            return false;
        }
        let Some(open) = self.accumulator.take() else {
            return false;
        };

        debug!(
            tray = self.next_global,
            local_tray = self.next_local,
            bake_group_id = %open.bake_group_id,
            used = open.used,
            capacity = open.capacity,
            trigger = ?trigger,
            "封盘"
        );

        self.sealed.push(EquipmentUnit {
            number: self.next_global,
            local_number: self.next_local,
            bake_group: open.bake_group_name,
            bake_group_id: open.bake_group_id,
            items: open.items,
            used: open.used,
            capacity: open.capacity,
        });
        self.next_global += 1;
        self.next_local += 1;
        true
    }

    /// 取出当前目的地组已封盘的托盘
    pub fn drain_sealed(&mut self) -> Vec<EquipmentUnit> {
        std::mem::take(&mut self.sealed)
    }

    /// 结束分配,返回产品→托盘分配表与总托盘数
    pub fn finish(self) -> (BTreeMap<String, BTreeMap<u32, u32>>, u32) {
        (self.assignments, self.next_global - 1)
    }
}

impl Default for AllocationState {
    fn default() -> Self {
        Self::new()
    }
}
