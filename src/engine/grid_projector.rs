// ==========================================
// 烘焙生产排盘系统 - 托盘网格投影
// ==========================================
// 职责: 将产品→托盘分配表转置为 产品 × 托盘 网格,按制作工艺分区
// 规则:
//   - 行排序: (烘焙组 priority 升序, 产品 display_order 升序)
//   - 无法解析的烘焙组按 priority 999 排在最后
//   - 分区顺序固定: laminated / fresh / frozen / par_baked,空分区省略
//   - 列表外的制作工艺只在网格分区中省略（设备视图仍可见）
// ==========================================

use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::plan::{TrayGrid, TrayGridRow, TrayGridSection};
use crate::domain::types::GRID_PREP_METHODS;
use crate::engine::allocation::TrayAssignmentMap;
use crate::engine::catalog::ProductCatalog;

// ==========================================
// GridProjector - 网格投影
// ==========================================
pub struct GridProjector {
    // 无状态引擎
}

impl GridProjector {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成托盘网格
    pub fn project(&self, assignments: &TrayAssignmentMap, catalog: &ProductCatalog) -> TrayGrid {
        let mut rows: Vec<(i32, i32, TrayGridRow)> = Vec::new();

        for (product_id, trays) in assignments {
            if trays.is_empty() {
                continue;
            }
            let total: u64 = trays.values().map(|q| u64::from(*q)).sum();

            let (row, display_order) = match catalog.product(product_id) {
                Some(product) => {
                    let bake_group_name = catalog
                        .bake_group(&product.bake_group_id)
                        .map(|g| g.name.clone())
                        .unwrap_or_default();
                    (
                        TrayGridRow {
                            product_id: product.id.clone(),
                            product_name: product.name.clone(),
                            bake_group_id: product.bake_group_id.clone(),
                            bake_group_name,
                            prep_method: product.prep_method.clone(),
                            trays: trays.clone(),
                            total,
                        },
                        product.display_order,
                    )
                }
                None => (
                    TrayGridRow {
                        product_id: product_id.clone(),
                        product_name: product_id.clone(),
                        bake_group_id: String::new(),
                        bake_group_name: String::new(),
                        prep_method: String::new(),
                        trays: trays.clone(),
                        total,
                    },
                    0,
                ),
            };

            let priority = catalog.bake_group_priority(&row.bake_group_id);
            rows.push((priority, display_order, row));
        }

        // 稳定排序,同键保持产品ID顺序
        rows.sort_by_key(|(priority, display_order, _)| (*priority, *display_order));
        let products: Vec<TrayGridRow> = rows.into_iter().map(|(_, _, row)| row).collect();

        let sections: Vec<TrayGridSection> = GRID_PREP_METHODS
            .iter()
            .filter_map(|prep_method| {
                let section_rows: Vec<TrayGridRow> = products
                    .iter()
                    .filter(|row| row.prep_method == *prep_method)
                    .cloned()
                    .collect();
                if section_rows.is_empty() {
                    return None;
                }
                let tray_numbers = distinct_tray_numbers(&section_rows);
                Some(TrayGridSection {
                    prep_method: prep_method.to_string(),
                    products: section_rows,
                    tray_numbers,
                })
            })
            .collect();

        let all_tray_numbers = distinct_tray_numbers(&products);

        debug!(
            rows = products.len(),
            sections = sections.len(),
            trays = all_tray_numbers.len(),
            "托盘网格生成完成"
        );

        TrayGrid {
            all_tray_numbers,
            sections,
            products,
        }
    }
}

impl Default for GridProjector {
    fn default() -> Self {
        Self::new()
    }
}

/// 行集合涉及的托盘号（升序去重）
fn distinct_tray_numbers(rows: &[TrayGridRow]) -> Vec<u32> {
    rows.iter()
        .flat_map(|row| row.trays.keys().copied())
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}
