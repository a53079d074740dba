// ==========================================
// 烘焙生产排盘系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 读取排盘输入快照,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod bake_group_repo;
pub mod destination_group_repo;
pub mod equipment_type_repo;
pub mod error;
pub mod order_line_repo;
pub mod product_repo;

// 重导出核心仓储
pub use bake_group_repo::BakeGroupRepository;
pub use destination_group_repo::DestinationGroupRepository;
pub use equipment_type_repo::EquipmentTypeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use order_line_repo::OrderLineRepository;
pub use product_repo::ProductRepository;
