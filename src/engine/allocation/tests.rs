use super::core::{summarize, utilization_percent};
use super::*;
use crate::config::planner_config::PlannerConfig;
use crate::domain::bake_group::{BakeGroup, EquipmentType};
use crate::domain::plan::EquipmentUnit;
use crate::domain::product::Product;
use crate::domain::types::DestinationRef;
use crate::engine::capacity_resolver::CapacityResolver;
use crate::engine::catalog::ProductCatalog;
use crate::engine::destinations::PlannedDestination;
use crate::engine::order_aggregator::OrderDemand;

// ==========================================
// 测试辅助函数
// ==========================================

fn product_with_capacity(id: &str, bake_group_id: &str, display_order: i32, capacity: i32) -> Product {
    let mut p = Product::new(id, &format!("{} name", id), bake_group_id);
    p.display_order = display_order;
    p.items_per_equipment = Some(capacity);
    p
}

fn destination(id: &str, priority: i32) -> PlannedDestination {
    PlannedDestination {
        destination: DestinationRef::Assigned(id.to_string()),
        name: format!("Route {}", id),
        bake_deadline: None,
        dispatch_time: None,
        priority,
    }
}

fn route(id: &str) -> DestinationRef {
    DestinationRef::Assigned(id.to_string())
}

fn item_pairs(unit: &EquipmentUnit) -> Vec<(&str, u32)> {
    unit.items.iter().map(|i| (i.product_id.as_str(), i.qty)).collect()
}

// ==========================================
// 状态机
// ==========================================

#[test]
fn test_empty_accumulator_never_flushes() {
    let acc = TrayAccumulator::Empty;
    assert!(!acc.should_flush(FlushTrigger::CapacityChanged { next_capacity: 3 }));
    assert!(!acc.should_flush(FlushTrigger::CapacityReached));
    assert!(!acc.should_flush(FlushTrigger::EndOfBakeGroup));
    assert!(!acc.should_flush(FlushTrigger::EndOfDestinationGroup));
}

#[test]
fn test_flush_triggers_on_open_tray() {
    let bake_group = BakeGroup::new("BG", "Bread", 1);
    let product = Product::new("A", "Baguette", "BG");

    let mut acc = TrayAccumulator::Empty;
    assert_eq!(acc.place(&bake_group, 6, &product, 4), 4);

    assert!(!acc.should_flush(FlushTrigger::CapacityChanged { next_capacity: 6 }));
    assert!(acc.should_flush(FlushTrigger::CapacityChanged { next_capacity: 8 }));
    assert!(acc.should_flush(FlushTrigger::CapacityChanged { next_capacity: 2 }));
    assert!(!acc.should_flush(FlushTrigger::CapacityReached));
    assert!(acc.should_flush(FlushTrigger::EndOfBakeGroup));
    assert!(acc.should_flush(FlushTrigger::EndOfDestinationGroup));

    assert_eq!(acc.place(&bake_group, 6, &product, 10), 2);
    assert!(acc.should_flush(FlushTrigger::CapacityReached));

    let open = acc.take().unwrap();
    assert_eq!(open.used, 6);
    assert!(acc.is_empty());
}

#[test]
fn test_state_numbering_and_assignments() {
    let bake_group = BakeGroup::new("BG", "Bread", 1);
    let product = Product::new("A", "Baguette", "BG");
    let mut state = AllocationState::new();

    state.begin_destination();
    assert!(state.accumulator().is_empty());
    state.place(&bake_group, 2, &product, 2);
    assert!(!state.accumulator().is_empty());
    assert!(state.flush_if(FlushTrigger::CapacityReached));
    assert!(state.accumulator().is_empty());
    assert_eq!((state.next_global(), state.next_local()), (2, 2));
    state.place(&bake_group, 2, &product, 1);
    assert!(state.flush_if(FlushTrigger::EndOfBakeGroup));
    let first = state.drain_sealed();

    state.begin_destination();
    assert_eq!((state.next_global(), state.next_local()), (3, 1));
    state.place(&bake_group, 2, &product, 1);
    assert!(!state.flush_if(FlushTrigger::CapacityReached));
    assert!(state.flush_if(FlushTrigger::EndOfDestinationGroup));
    let second = state.drain_sealed();

    let numbers: Vec<(u32, u32)> = first
        .iter()
        .chain(second.iter())
        .map(|u| (u.number, u.local_number))
        .collect();
    assert_eq!(numbers, vec![(1, 1), (2, 2), (3, 1)]);

    let (assignments, total_trays) = state.finish();
    assert_eq!(total_trays, 3);
    let trays: Vec<(u32, u32)> = assignments["A"].iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(trays, vec![(1, 2), (2, 1), (3, 1)]);
}

// ==========================================
// 场景 A: 同容量连续装载
// ==========================================

#[test]
fn test_scenario_same_capacity_fills_then_seals_at_bake_group_end() {
    let groups = vec![BakeGroup::new("BG", "Bread", 1)];
    let products = vec![
        product_with_capacity("A", "BG", 0, 6),
        product_with_capacity("B", "BG", 1, 6),
    ];
    let catalog = ProductCatalog::build(&groups, &products, &[], "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "A", 10);
    demand.add(route("R1"), "B", 2);

    let result = AllocationEngine::default().allocate(&[destination("R1", 1)], &catalog, &demand);

    assert_eq!(result.total_trays, 2);
    let plan = &result.destination_plans[0];
    assert_eq!(plan.equipment.len(), 2);
    assert_eq!(item_pairs(&plan.equipment[0]), vec![("A", 6)]);
    assert_eq!(plan.equipment[0].used, 6);
    assert_eq!(item_pairs(&plan.equipment[1]), vec![("A", 4), ("B", 2)]);
    assert_eq!(plan.equipment[1].used, 6);
    assert_eq!(plan.summary.utilization_percent, 100);
    assert_eq!((plan.tray_start, plan.tray_end), (1, 2));
}

#[test]
fn test_same_capacity_overflow_opens_next_tray() {
    let groups = vec![BakeGroup::new("BG", "Bread", 1)];
    let products = vec![
        product_with_capacity("A", "BG", 0, 6),
        product_with_capacity("B", "BG", 1, 6),
    ];
    let catalog = ProductCatalog::build(&groups, &products, &[], "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "A", 10);
    demand.add(route("R1"), "B", 4);

    let result = AllocationEngine::default().allocate(&[destination("R1", 1)], &catalog, &demand);
    let plan = &result.destination_plans[0];

    assert_eq!(result.total_trays, 3);
    assert_eq!(item_pairs(&plan.equipment[1]), vec![("A", 4), ("B", 2)]);
    assert_eq!(item_pairs(&plan.equipment[2]), vec![("B", 2)]);
    // 16 / 18
    assert_eq!(plan.summary.utilization_percent, 89);
}

// ==========================================
// 场景 B: 容量变化强制封盘
// ==========================================

#[test]
fn test_scenario_capacity_change_seals_partial_tray() {
    let groups = vec![BakeGroup::new("BG", "Bread", 1)];
    let products = vec![
        product_with_capacity("A", "BG", 0, 6),
        product_with_capacity("B", "BG", 1, 8),
        product_with_capacity("C", "BG", 2, 6),
    ];
    let catalog = ProductCatalog::build(&groups, &products, &[], "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "A", 3);
    demand.add(route("R1"), "B", 2);
    demand.add(route("R1"), "C", 1);

    let result = AllocationEngine::default().allocate(&[destination("R1", 1)], &catalog, &demand);
    let units = &result.destination_plans[0].equipment;

    assert_eq!(units.len(), 3);
    assert_eq!(item_pairs(&units[0]), vec![("A", 3)]);
    assert_eq!((units[0].used, units[0].capacity), (3, 6));
    // 容量减小同样触发封盘
    assert_eq!((units[1].used, units[1].capacity), (2, 8));
    assert_eq!((units[2].used, units[2].capacity), (1, 6));
    assert_eq!(result.destination_plans[0].summary.utilization_percent, 30);
}

#[test]
fn test_trays_never_straddle_bake_groups() {
    let groups = vec![
        BakeGroup::new("BREAD", "Bread", 2),
        BakeGroup::new("PASTRY", "Pastry", 1),
    ];
    let products = vec![
        product_with_capacity("LOAF", "BREAD", 0, 10),
        product_with_capacity("CROISSANT", "PASTRY", 0, 10),
    ];
    let catalog = ProductCatalog::build(&groups, &products, &[], "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "LOAF", 3);
    demand.add(route("R1"), "CROISSANT", 3);

    let result = AllocationEngine::default().allocate(&[destination("R1", 1)], &catalog, &demand);
    let units = &result.destination_plans[0].equipment;

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].bake_group_id, "PASTRY");
    assert_eq!(units[0].bake_group, "Pastry");
    assert_eq!(units[1].bake_group_id, "BREAD");
    assert_eq!(result.destination_plans[0].summary.utilization_percent, 30);
}

#[test]
fn test_numbering_across_destination_groups() {
    let groups = vec![BakeGroup::new("BG", "Bread", 1)];
    let products = vec![product_with_capacity("A", "BG", 0, 4)];
    let catalog = ProductCatalog::build(&groups, &products, &[], "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "A", 9);
    demand.add(route("R3"), "A", 4);

    let destinations = vec![destination("R1", 1), destination("R2", 2), destination("R3", 3)];
    let result = AllocationEngine::default().allocate(&destinations, &catalog, &demand);

    // R2 无需求: 不出现,不消耗托盘号
    assert_eq!(result.destination_plans.len(), 2);
    let r1 = &result.destination_plans[0];
    let r3 = &result.destination_plans[1];

    let r1_numbers: Vec<(u32, u32)> = r1.equipment.iter().map(|u| (u.number, u.local_number)).collect();
    assert_eq!(r1_numbers, vec![(1, 1), (2, 2), (3, 3)]);
    assert_eq!((r1.tray_start, r1.tray_end), (1, 3));

    let r3_numbers: Vec<(u32, u32)> = r3.equipment.iter().map(|u| (u.number, u.local_number)).collect();
    assert_eq!(r3_numbers, vec![(4, 1)]);
    assert_eq!((r3.tray_start, r3.tray_end), (4, 4));
    assert_eq!(result.total_trays, 4);
}

#[test]
fn test_capacity_profile_drives_tray_size() {
    let groups = vec![BakeGroup::new("BG", "Pastry", 1).with_capacity_profile("HALF")];
    let mut product = Product::new("A", "Danish", "BG");
    product.equipment_type_id = Some("RACK".to_string());
    let types = vec![EquipmentType::new("RACK", 12).with_profile("half", 5)];
    let catalog = ProductCatalog::build(&groups, &[product], &types, "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "A", 11);

    let engine = AllocationEngine::new(CapacityResolver::new(PlannerConfig::default().fallback_capacity));
    let result = engine.allocate(&[destination("R1", 1)], &catalog, &demand);
    let used: Vec<(u32, u32)> = result.destination_plans[0]
        .equipment
        .iter()
        .map(|u| (u.used, u.capacity))
        .collect();

    assert_eq!(used, vec![(5, 5), (5, 5), (1, 5)]);
}

#[test]
fn test_assignment_map_matches_equipment() {
    let groups = vec![BakeGroup::new("BG", "Bread", 1)];
    let products = vec![
        product_with_capacity("A", "BG", 0, 5),
        product_with_capacity("B", "BG", 1, 5),
    ];
    let catalog = ProductCatalog::build(&groups, &products, &[], "fresh");

    let mut demand = OrderDemand::new();
    demand.add(route("R1"), "A", 7);
    demand.add(route("R1"), "B", 6);
    demand.add(route("R2"), "B", 2);

    let result = AllocationEngine::default().allocate(
        &[destination("R1", 1), destination("R2", 2)],
        &catalog,
        &demand,
    );

    for plan in &result.destination_plans {
        for unit in &plan.equipment {
            for item in &unit.items {
                assert_eq!(result.tray_assignments[&item.product_id][&unit.number], item.qty);
            }
        }
    }
    let total_b: u32 = result.tray_assignments["B"].values().sum();
    assert_eq!(total_b, 8);
}

// ==========================================
// 汇总
// ==========================================

#[test]
fn test_utilization_rounding_and_zero_guard() {
    assert_eq!(utilization_percent(0, 0), 0);
    assert_eq!(utilization_percent(1, 3), 33);
    assert_eq!(utilization_percent(2, 3), 67);
    assert_eq!(utilization_percent(1, 8), 13); // 12.5 -> 13
    assert_eq!(summarize(&[]).utilization_percent, 0);
}
