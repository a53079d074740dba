// ==========================================
// 烘焙生产排盘系统 - 托盘分配引擎
// ==========================================
// 职责: 流式装箱,把聚合需求装入设备单元（托盘）
// 输入: 排序后的目的地组 + 产品目录 + 聚合需求
// 输出: 设备单元列表 + 产品→托盘分配表（供网格视图使用）
// ==========================================
// 红线: 托盘不跨烘焙组
// 红线: 容量变化（无论增减）必须另起新托盘
// 红线: 计数器只属于单次调用,不得提升为进程级共享状态
// ==========================================

mod accumulator;
mod core;

#[cfg(test)]
mod tests;

pub use accumulator::{AllocationState, FlushTrigger, OpenTray, TrayAccumulator};
pub use self::core::{AllocationEngine, AllocationResult, TrayAssignmentMap};
