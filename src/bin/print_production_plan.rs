// Small dev utility: build the production plan for one delivery date and print it as JSON.
//
// Usage:
//   cargo run --bin print_production_plan -- <company_id> <delivery_date> [site_id] [db_path]
//
// db_path defaults to TRAY_PLANNING_DB_PATH / the user data dir (see app::get_default_db_path).

use anyhow::{bail, Context};
use tray_planning::api::PlanRequest;
use tray_planning::app::{get_default_db_path, AppState};
use tray_planning::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_json();

    let mut args = std::env::args().skip(1);
    let company_id = match args.next() {
        Some(v) => v,
        None => bail!("usage: print_production_plan <company_id> <delivery_date> [site_id] [db_path]"),
    };
    let delivery_date = args.next().context("missing delivery_date (YYYY-MM-DD)")?;
    let site_id = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "-");
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let mut request = PlanRequest::new(&company_id, &delivery_date);
    request.site_id = site_id;

    let plan = state
        .production_plan_api
        .build_plan(&request)
        .await
        .context("build production plan")?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
