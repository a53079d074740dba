// ==========================================
// 烘焙生产排盘系统 - 产品目录
// ==========================================
// 职责: 将快照中的烘焙组/产品/设备类型整理为排盘顺序与查找表
// 顺序:
//   - 烘焙组按 priority 升序（相同优先级保持输入顺序）
//   - 组内产品按 display_order 升序（相同值保持输入顺序）
// ==========================================

use std::collections::HashMap;
use tracing::warn;

use crate::domain::bake_group::{BakeGroup, EquipmentType};
use crate::domain::product::Product;

/// 网格视图中无法解析烘焙组时使用的排序优先级
pub const UNRESOLVED_BAKE_GROUP_PRIORITY: i32 = 999;

// ==========================================
// ProductCatalog - 产品目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    bake_groups: Vec<BakeGroup>,
    bake_group_index: HashMap<String, usize>,
    products: Vec<Product>,
    product_index: HashMap<String, usize>,
    products_per_group: Vec<Vec<usize>>,
    equipment_types: HashMap<String, EquipmentType>,
}

impl ProductCatalog {
    /// 由快照主数据构建目录
    ///
    /// # 参数
    /// - default_prep_method: 产品制作工艺为空时使用的默认值
    ///
    /// # 说明
    /// - ID 重复时保留第一条并告警
    /// - 制作工艺统一为去空白小写
    pub fn build(
        bake_groups: &[BakeGroup],
        products: &[Product],
        equipment_types: &[EquipmentType],
        default_prep_method: &str,
    ) -> Self {
        let mut sorted_groups: Vec<BakeGroup> = Vec::with_capacity(bake_groups.len());
        for bg in bake_groups {
            if sorted_groups.iter().any(|g| g.id == bg.id) {
                warn!(bake_group_id = %bg.id, "烘焙组ID重复，保留第一条");
                continue;
            }
            sorted_groups.push(bg.clone());
        }
        sorted_groups.sort_by_key(|g| g.priority);

        let bake_group_index: HashMap<String, usize> = sorted_groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.clone(), i))
            .collect();

        let mut catalog_products: Vec<Product> = Vec::with_capacity(products.len());
        let mut product_index: HashMap<String, usize> = HashMap::new();
        for product in products {
            if product_index.contains_key(&product.id) {
                warn!(product_id = %product.id, "产品ID重复，保留第一条");
                continue;
            }
            let mut normalized = product.clone();
            let prep = normalized.prep_method.trim().to_ascii_lowercase();
            normalized.prep_method = if prep.is_empty() {
                default_prep_method.to_string()
            } else {
                prep
            };
            product_index.insert(normalized.id.clone(), catalog_products.len());
            catalog_products.push(normalized);
        }

        let mut products_per_group: Vec<Vec<usize>> = vec![Vec::new(); sorted_groups.len()];
        for (idx, product) in catalog_products.iter().enumerate() {
            match bake_group_index.get(&product.bake_group_id) {
                Some(&g) => products_per_group[g].push(idx),
                None => warn!(
                    product_id = %product.id,
                    bake_group_id = %product.bake_group_id,
                    "产品所属烘焙组不存在，不参与排盘"
                ),
            }
        }
        for members in products_per_group.iter_mut() {
            members.sort_by_key(|&idx| catalog_products[idx].display_order);
        }

        let mut equipment_map: HashMap<String, EquipmentType> = HashMap::new();
        for et in equipment_types {
            if equipment_map.contains_key(&et.id) {
                warn!(equipment_type_id = %et.id, "设备类型ID重复，保留第一条");
                continue;
            }
            equipment_map.insert(et.id.clone(), et.clone());
        }

        Self {
            bake_groups: sorted_groups,
            bake_group_index,
            products: catalog_products,
            product_index,
            products_per_group,
            equipment_types: equipment_map,
        }
    }

    /// 按优先级排序后的烘焙组
    pub fn bake_groups(&self) -> &[BakeGroup] {
        &self.bake_groups
    }

    /// 烘焙组内按 display_order 排序的产品
    pub fn products_in(&self, bake_group_id: &str) -> impl Iterator<Item = &Product> {
        self.bake_group_index
            .get(bake_group_id)
            .map(|&g| self.products_per_group[g].as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.products[idx])
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.product_index.get(product_id).map(|&idx| &self.products[idx])
    }

    pub fn bake_group(&self, bake_group_id: &str) -> Option<&BakeGroup> {
        self.bake_group_index
            .get(bake_group_id)
            .map(|&idx| &self.bake_groups[idx])
    }

    /// 产品是否能参与排盘（产品存在且烘焙组可解析）
    pub fn is_plannable(&self, product_id: &str) -> bool {
        self.product(product_id)
            .map(|p| self.bake_group_index.contains_key(&p.bake_group_id))
            .unwrap_or(false)
    }

    /// 烘焙组排序优先级（无法解析时排在最后）
    pub fn bake_group_priority(&self, bake_group_id: &str) -> i32 {
        self.bake_group(bake_group_id)
            .map(|g| g.priority)
            .unwrap_or(UNRESOLVED_BAKE_GROUP_PRIORITY)
    }

    pub fn equipment_types(&self) -> &HashMap<String, EquipmentType> {
        &self.equipment_types
    }
}
