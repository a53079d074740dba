// ==========================================
// 排盘引擎集成测试
// ==========================================
// 测试目标: 以内存快照驱动完整流水线,验证计划文档的不变量
// ==========================================

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tray_planning::config::PlannerConfig;
use tray_planning::domain::{
    BakeGroup, DestinationGroup, DestinationRef, EquipmentType, OrderLine, PlanningSnapshot,
    Product, ProductionPlan, ShipState,
};
use tray_planning::engine::{CapacityResolver, CapacitySource, ProductionPlanOrchestrator};
use tray_planning::logging;

// ==========================================
// 测试辅助函数
// ==========================================

fn delivery_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn product(id: &str, bake_group_id: &str, display_order: i32, capacity: i32, prep: &str) -> Product {
    let mut p = Product::new(id, &format!("{} name", id), bake_group_id);
    p.display_order = display_order;
    p.items_per_equipment = Some(capacity);
    p.prep_method = prep.to_string();
    p
}

fn route(id: &str) -> DestinationRef {
    DestinationRef::Assigned(id.to_string())
}

fn line(destination: &str, product_id: &str, qty: i64) -> OrderLine {
    OrderLine::new(route(destination), product_id, qty)
}

/// 两条路线、两个烘焙组、四个产品的快照
fn bakery_snapshot() -> PlanningSnapshot {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![
        DestinationGroup::new("NORTH", "North route", 2),
        DestinationGroup::new("SOUTH", "South route", 1),
    ];
    snapshot.bake_groups = vec![
        BakeGroup::new("BREAD", "Bread", 2),
        BakeGroup::new("PASTRY", "Pastry", 1),
    ];
    snapshot.products = vec![
        product("CROISSANT", "PASTRY", 1, 6, "laminated"),
        product("PAIN_CHOC", "PASTRY", 2, 6, "laminated"),
        product("BAGUETTE", "BREAD", 1, 10, "par_baked"),
        product("SOURDOUGH", "BREAD", 2, 8, "fresh"),
    ];
    snapshot.order_lines = vec![
        line("NORTH", "CROISSANT", 14),
        line("NORTH", "SOURDOUGH", 9),
        line("SOUTH", "CROISSANT", 4),
        line("SOUTH", "PAIN_CHOC", 5),
        line("SOUTH", "BAGUETTE", 23),
        line("NORTH", "BAGUETTE", 3).with_ship_state(ShipState::Frozen),
    ];
    snapshot
}

fn run(snapshot: &PlanningSnapshot) -> ProductionPlan {
    ProductionPlanOrchestrator::new(PlannerConfig::default()).execute(snapshot)
}

/// 计划中每个 (目的地组, 产品) 的件数
fn placed_by_destination(plan: &ProductionPlan) -> BTreeMap<(String, String), u64> {
    let mut placed = BTreeMap::new();
    for group in &plan.destination_groups {
        for unit in &group.equipment {
            for item in &unit.items {
                *placed
                    .entry((group.destination_group_id.clone(), item.product_id.clone()))
                    .or_insert(0) += u64::from(item.qty);
            }
        }
    }
    placed
}

// ==========================================
// 不变量
// ==========================================

#[test]
fn test_quantity_conservation() {
    logging::init_test();
    let plan = run(&bakery_snapshot());
    let placed = placed_by_destination(&plan);

    let key = |d: &str, p: &str| (d.to_string(), p.to_string());
    assert_eq!(placed[&key("NORTH", "CROISSANT")], 14);
    assert_eq!(placed[&key("NORTH", "SOURDOUGH")], 9);
    assert_eq!(placed[&key("SOUTH", "CROISSANT")], 4);
    assert_eq!(placed[&key("SOUTH", "PAIN_CHOC")], 5);
    assert_eq!(placed[&key("SOUTH", "BAGUETTE")], 23);
    // 冷冻订单不出现
    assert!(!placed.contains_key(&key("NORTH", "BAGUETTE")));
}

#[test]
fn test_units_respect_capacity_and_single_bake_group() {
    let snapshot = bakery_snapshot();
    let plan = run(&snapshot);
    let bake_group_of: BTreeMap<&str, &str> = snapshot
        .products
        .iter()
        .map(|p| (p.id.as_str(), p.bake_group_id.as_str()))
        .collect();

    for unit in plan.all_equipment() {
        let used: u32 = unit.items.iter().map(|i| i.qty).sum();
        assert_eq!(used, unit.used);
        assert!(unit.used >= 1);
        assert!(unit.used <= unit.capacity);
        for item in &unit.items {
            assert_eq!(bake_group_of[item.product_id.as_str()], unit.bake_group_id);
        }
    }
}

#[test]
fn test_tray_numbering_is_contiguous() {
    let plan = run(&bakery_snapshot());

    let numbers: Vec<u32> = plan.all_equipment().map(|u| u.number).collect();
    let expected: Vec<u32> = (1..=plan.total_trays).collect();
    assert_eq!(numbers, expected);

    let mut next_start = 1;
    for group in &plan.destination_groups {
        assert_eq!(group.tray_start, next_start);
        assert_eq!(group.tray_end, group.tray_start + group.equipment.len() as u32 - 1);
        let locals: Vec<u32> = group.equipment.iter().map(|u| u.local_number).collect();
        let expected_locals: Vec<u32> = (1..=group.equipment.len() as u32).collect();
        assert_eq!(locals, expected_locals);
        next_start = group.tray_end + 1;
    }
}

#[test]
fn test_destination_groups_follow_priority() {
    let plan = run(&bakery_snapshot());
    let ids: Vec<&str> = plan
        .destination_groups
        .iter()
        .map(|g| g.destination_group_id.as_str())
        .collect();
    assert_eq!(ids, vec!["SOUTH", "NORTH"]);

    // SOUTH: PASTRY 先排 (CROISSANT 4 + PAIN_CHOC 2 | PAIN_CHOC 3), 再 BREAD (BAGUETTE 10/10/3)
    let south = &plan.destination_groups[0];
    let layout: Vec<(&str, Vec<(&str, u32)>)> = south
        .equipment
        .iter()
        .map(|u| {
            (
                u.bake_group_id.as_str(),
                u.items.iter().map(|i| (i.product_id.as_str(), i.qty)).collect(),
            )
        })
        .collect();
    assert_eq!(
        layout,
        vec![
            ("PASTRY", vec![("CROISSANT", 4), ("PAIN_CHOC", 2)]),
            ("PASTRY", vec![("PAIN_CHOC", 3)]),
            ("BREAD", vec![("BAGUETTE", 10)]),
            ("BREAD", vec![("BAGUETTE", 10)]),
            ("BREAD", vec![("BAGUETTE", 3)]),
        ]
    );
    assert_eq!(south.summary.total_equipment, 5);
    assert_eq!(south.summary.total_items, 32);
    // 32 / (6 + 6 + 10 + 10 + 10) = 76.19%
    assert_eq!(south.summary.utilization_percent, 76);
}

#[test]
fn test_grid_matches_equipment_view() {
    let plan = run(&bakery_snapshot());

    let mut from_units: BTreeMap<(String, u32), u32> = BTreeMap::new();
    for unit in plan.all_equipment() {
        for item in &unit.items {
            *from_units.entry((item.product_id.clone(), unit.number)).or_insert(0) += item.qty;
        }
    }

    let mut from_grid: BTreeMap<(String, u32), u32> = BTreeMap::new();
    for row in &plan.tray_grid.products {
        for (tray, qty) in &row.trays {
            from_grid.insert((row.product_id.clone(), *tray), *qty);
        }
        assert_eq!(row.total, row.trays.values().map(|q| u64::from(*q)).sum::<u64>());
    }
    assert_eq!(from_units, from_grid);

    let sections: Vec<&str> = plan
        .tray_grid
        .sections
        .iter()
        .map(|s| s.prep_method.as_str())
        .collect();
    assert_eq!(sections, vec!["laminated", "fresh", "par_baked"]);
    assert_eq!(
        plan.tray_grid.all_tray_numbers,
        (1..=plan.total_trays).collect::<Vec<u32>>()
    );
}

#[test]
fn test_same_snapshot_same_plan() {
    let snapshot = bakery_snapshot();
    let first = run(&snapshot);
    let second = run(&snapshot);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_order_line_order_does_not_matter() {
    let snapshot = bakery_snapshot();
    let mut reversed = snapshot.clone();
    reversed.order_lines.reverse();
    assert_eq!(run(&snapshot), run(&reversed));
}

// ==========================================
// 场景
// ==========================================

#[test]
fn test_scenario_a_same_capacity() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 1)];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![
        product("A", "BG", 1, 6, "fresh"),
        product("B", "BG", 2, 6, "fresh"),
    ];
    snapshot.order_lines = vec![line("R1", "A", 10), line("R1", "B", 2)];

    let plan = run(&snapshot);

    assert_eq!(plan.total_trays, 2);
    let units = &plan.destination_groups[0].equipment;
    let items: Vec<Vec<(&str, u32)>> = units
        .iter()
        .map(|u| u.items.iter().map(|i| (i.product_id.as_str(), i.qty)).collect())
        .collect();
    assert_eq!(items, vec![vec![("A", 6)], vec![("A", 4), ("B", 2)]]);
    assert_eq!(plan.destination_groups[0].summary.utilization_percent, 100);
}

#[test]
fn test_scenario_b_capacity_change_seals_partial_unit() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 1)];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![
        product("A", "BG", 1, 6, "fresh"),
        product("B", "BG", 2, 8, "fresh"),
    ];
    snapshot.order_lines = vec![line("R1", "A", 3), line("R1", "B", 5)];

    let plan = run(&snapshot);
    let units = &plan.destination_groups[0].equipment;

    assert_eq!(units.len(), 2);
    assert_eq!((units[0].used, units[0].capacity), (3, 6));
    assert_eq!(units[0].items[0].product_id, "A");
    assert_eq!((units[1].used, units[1].capacity), (5, 8));
    assert_eq!(units[1].items[0].product_id, "B");
}

#[test]
fn test_scenario_c_frozen_lines_contribute_nothing() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 1)];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![product("A", "BG", 1, 6, "fresh")];
    snapshot.order_lines =
        vec![line("R1", "A", 100).with_ship_state(ShipState::from_db_str(" FROZEN "))];

    let plan = run(&snapshot);

    assert_eq!(plan.total_trays, 0);
    assert!(plan.destination_groups.is_empty());
    assert!(plan.tray_grid.products.is_empty());
    assert!(plan.tray_grid.sections.is_empty());
}

#[test]
fn test_scenario_d_unknown_prep_method_only_in_equipment_view() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 1)];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![
        product("STARTER", "BG", 1, 4, "sourdough_starter"),
        product("ROLL", "BG", 2, 4, "fresh"),
    ];
    snapshot.order_lines = vec![line("R1", "STARTER", 2), line("R1", "ROLL", 2)];

    let plan = run(&snapshot);

    assert!(plan
        .all_equipment()
        .any(|u| u.items.iter().any(|i| i.product_id == "STARTER")));
    for section in &plan.tray_grid.sections {
        assert!(section.products.iter().all(|r| r.product_id != "STARTER"));
    }
    assert!(plan.tray_grid.products.iter().any(|r| r.product_id == "STARTER"));
}

// ==========================================
// 未分配组 / 无法排盘的需求
// ==========================================

#[test]
fn test_unassigned_and_unknown_destinations_plan_last() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    let mut inactive = DestinationGroup::new("OLD", "Old route", 0);
    inactive.is_active = false;
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 999), inactive];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![product("A", "BG", 1, 5, "fresh")];
    snapshot.order_lines = vec![
        OrderLine::new(DestinationRef::Unassigned, "A", 2),
        line("OLD", "A", 3),
        line("GHOST", "A", 1),
        line("R1", "A", 4),
    ];

    let plan = run(&snapshot);

    let ids: Vec<&str> = plan
        .destination_groups
        .iter()
        .map(|g| g.destination_group_id.as_str())
        .collect();
    assert_eq!(ids, vec!["R1", "unassigned"]);

    let unassigned = &plan.destination_groups[1];
    assert_eq!(unassigned.destination_group_name, "Unassigned");
    assert_eq!(unassigned.summary.total_items, 6);
    assert_eq!(unassigned.bake_deadline, None);
}

#[test]
fn test_group_using_reserved_id_merges_into_unassigned() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![
        DestinationGroup::new("unassigned", "Real walk-in", 1),
        DestinationGroup::new("R1", "Route 1", 2),
    ];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![product("A", "BG", 1, 5, "fresh")];
    snapshot.order_lines = vec![
        line("unassigned", "A", 3),
        OrderLine::new(DestinationRef::Unassigned, "A", 2),
        line("R1", "A", 4),
    ];

    let plan = run(&snapshot);

    let ids: Vec<(&str, &str)> = plan
        .destination_groups
        .iter()
        .map(|g| (g.destination_group_id.as_str(), g.destination_group_name.as_str()))
        .collect();
    assert_eq!(ids, vec![("R1", "Route 1"), ("unassigned", "Unassigned")]);
    assert_eq!(plan.destination_groups[1].summary.total_items, 5);
}

#[test]
fn test_unknown_products_are_excluded() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 1)];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![
        product("A", "BG", 1, 5, "fresh"),
        product("ORPHAN", "MISSING_GROUP", 1, 5, "fresh"),
    ];
    snapshot.order_lines = vec![
        line("R1", "A", 3),
        line("R1", "ORPHAN", 4),
        line("R1", "NOT_IN_CATALOG", 7),
    ];

    let plan = run(&snapshot);

    assert_eq!(plan.total_trays, 1);
    let items: Vec<&str> = plan
        .all_equipment()
        .flat_map(|u| u.items.iter().map(|i| i.product_id.as_str()))
        .collect();
    assert_eq!(items, vec!["A"]);
}

#[test]
fn test_empty_snapshot_gives_empty_plan() {
    let plan = run(&PlanningSnapshot::empty(delivery_date()));
    assert_eq!(plan.delivery_date, delivery_date());
    assert_eq!(plan.total_trays, 0);
    assert!(plan.destination_groups.is_empty());
    assert!(plan.tray_grid.all_tray_numbers.is_empty());
}

// ==========================================
// 容量解析
// ==========================================

#[test]
fn test_capacity_resolution_precedence() {
    let resolver = CapacityResolver::new(18);
    let types: std::collections::HashMap<String, EquipmentType> = [(
        "DECK".to_string(),
        EquipmentType::new("DECK", 12).with_profile("half", 6),
    )]
    .into_iter()
    .collect();
    let with_profile = BakeGroup::new("BG", "Bread", 1).with_capacity_profile(" HALF ");
    let plain = BakeGroup::new("BG", "Bread", 1);

    let mut p = Product::new("A", "A", "BG");
    assert_eq!(
        resolver.resolve_with_source(&p, Some(&plain), &types),
        (18, CapacitySource::Fallback)
    );

    p.items_per_tray = Some(9);
    assert_eq!(
        resolver.resolve_with_source(&p, Some(&plain), &types),
        (9, CapacitySource::LegacyItemsPerTray)
    );

    p.equipment_type_id = Some("DECK".to_string());
    assert_eq!(
        resolver.resolve_with_source(&p, Some(&plain), &types),
        (12, CapacitySource::EquipmentDefault)
    );
    assert_eq!(
        resolver.resolve_with_source(&p, Some(&with_profile), &types),
        (6, CapacitySource::CapacityProfile)
    );

    p.items_per_equipment = Some(4);
    assert_eq!(
        resolver.resolve_with_source(&p, Some(&with_profile), &types),
        (4, CapacitySource::ProductOverride)
    );
}

#[test]
fn test_fallback_capacity_from_config() {
    let mut snapshot = PlanningSnapshot::empty(delivery_date());
    snapshot.destination_groups = vec![DestinationGroup::new("R1", "Route 1", 1)];
    snapshot.bake_groups = vec![BakeGroup::new("BG", "Bread", 1)];
    snapshot.products = vec![Product::new("A", "A", "BG")];
    snapshot.order_lines = vec![line("R1", "A", 25)];

    let plan = run(&snapshot);
    let capacities: Vec<(u32, u32)> = plan.all_equipment().map(|u| (u.used, u.capacity)).collect();
    assert_eq!(capacities, vec![(18, 18), (7, 18)]);

    let config = PlannerConfig {
        fallback_capacity: 10,
        ..PlannerConfig::default()
    };
    let plan = ProductionPlanOrchestrator::new(config).execute(&snapshot);
    assert_eq!(plan.total_trays, 3);
}
