// ==========================================
// 烘焙生产排盘系统 - 生产排盘 API
// ==========================================
// 职责:
// - 校验请求参数
// - 读取排盘配置（每次请求读取一次）
// - 装载输入快照（公司/站点/交货日期作用域）
// - 调用引擎编排器生成生产计划
// 说明:
// - 单个集合读取失败时记录告警并按空集合继续,不中断排盘
// - 只读,不写回任何数据
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::planner_config::PlannerConfig;
use crate::config::planner_config_trait::PlannerConfigReader;
use crate::domain::plan::ProductionPlan;
use crate::domain::snapshot::PlanningSnapshot;
use crate::engine::orchestrator::ProductionPlanOrchestrator;
use crate::repository::error::RepositoryResult;
use crate::repository::{
    BakeGroupRepository, DestinationGroupRepository, EquipmentTypeRepository,
    OrderLineRepository, ProductRepository,
};

// ==========================================
// PlanRequest - 排盘请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub company_id: String,
    #[serde(default)]
    pub site_id: Option<String>,
    /// YYYY-MM-DD
    pub delivery_date: String,
}

impl PlanRequest {
    pub fn new(company_id: &str, delivery_date: &str) -> Self {
        Self {
            company_id: company_id.to_string(),
            site_id: None,
            delivery_date: delivery_date.to_string(),
        }
    }

    pub fn with_site(mut self, site_id: &str) -> Self {
        self.site_id = Some(site_id.to_string());
        self
    }
}

/// 校验后的请求参数
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidatedRequest {
    company_id: String,
    site_id: Option<String>,
    delivery_date: NaiveDate,
}

// ==========================================
// ProductionPlanApi - 生产排盘 API
// ==========================================
pub struct ProductionPlanApi {
    destination_group_repo: Arc<DestinationGroupRepository>,
    bake_group_repo: Arc<BakeGroupRepository>,
    equipment_type_repo: Arc<EquipmentTypeRepository>,
    product_repo: Arc<ProductRepository>,
    order_line_repo: Arc<OrderLineRepository>,
    config_reader: Arc<dyn PlannerConfigReader>,
}

impl ProductionPlanApi {
    pub fn new(
        destination_group_repo: Arc<DestinationGroupRepository>,
        bake_group_repo: Arc<BakeGroupRepository>,
        equipment_type_repo: Arc<EquipmentTypeRepository>,
        product_repo: Arc<ProductRepository>,
        order_line_repo: Arc<OrderLineRepository>,
        config_reader: Arc<dyn PlannerConfigReader>,
    ) -> Self {
        Self {
            destination_group_repo,
            bake_group_repo,
            equipment_type_repo,
            product_repo,
            order_line_repo,
            config_reader,
        }
    }

    fn validate(request: &PlanRequest) -> ApiResult<ValidatedRequest> {
        let company_id = request.company_id.trim();
        if company_id.is_empty() {
            return Err(ApiError::InvalidInput("公司ID不能为空".to_string()));
        }

        let raw_date = request.delivery_date.trim();
        if raw_date.is_empty() {
            return Err(ApiError::InvalidInput("交货日期不能为空".to_string()));
        }
        let delivery_date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            ApiError::InvalidInput(format!(
                "交货日期格式错误（应为 YYYY-MM-DD）: {}",
                raw_date
            ))
        })?;

        let site_id = request
            .site_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ValidatedRequest {
            company_id: company_id.to_string(),
            site_id,
            delivery_date,
        })
    }

    /// 生成生产计划
    ///
    /// # 返回
    /// - Ok(ProductionPlan): 计划文档（无订单时为空计划）
    /// - Err(ApiError::InvalidInput): 请求参数非法
    #[instrument(skip(self), fields(
        company_id = %request.company_id,
        delivery_date = %request.delivery_date
    ))]
    pub async fn build_plan(&self, request: &PlanRequest) -> ApiResult<ProductionPlan> {
        let validated = Self::validate(request)?;

        let config = PlannerConfig::load(self.config_reader.as_ref()).await;
        let snapshot = self.load_snapshot(&validated);

        let orchestrator = ProductionPlanOrchestrator::new(config);
        let plan = orchestrator.execute(&snapshot);

        info!(
            total_trays = plan.total_trays,
            destination_groups = plan.destination_groups.len(),
            "生产计划生成完成"
        );
        Ok(plan)
    }

    /// 生成生产计划并转换为 JSON 文档
    pub async fn build_plan_json(&self, request: &PlanRequest) -> ApiResult<serde_json::Value> {
        let plan = self.build_plan(request).await?;
        serde_json::to_value(&plan)
            .map_err(|e| ApiError::InternalError(format!("计划序列化失败: {}", e)))
    }

    /// 装载输入快照
    fn load_snapshot(&self, request: &ValidatedRequest) -> PlanningSnapshot {
        let company_id = request.company_id.as_str();

        let destination_groups = or_empty(
            "destination_group",
            self.destination_group_repo.find_active_by_company(company_id),
        );
        let bake_groups = or_empty("bake_group", self.bake_group_repo.find_by_company(company_id));
        let equipment_types = or_empty(
            "equipment_type",
            self.equipment_type_repo
                .find_for_site(company_id, request.site_id.as_deref()),
        );
        let products = or_empty("product", self.product_repo.find_by_company(company_id));
        let order_lines = or_empty(
            "order_line",
            self.order_line_repo
                .find_plannable_by_delivery_date(company_id, request.delivery_date),
        );

        PlanningSnapshot {
            delivery_date: request.delivery_date,
            destination_groups,
            bake_groups,
            equipment_types,
            products,
            order_lines,
        }
    }
}

/// 集合读取失败时记录告警并返回空集合
fn or_empty<T>(collection: &str, result: RepositoryResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(collection, error = %e, "集合读取失败，按空集合继续排盘");
            Vec::new()
        }
    }
}
