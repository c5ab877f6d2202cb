use anyhow::Result;
use clap::Args;
use nextapp::services::features;
use nextapp::{
    ActivityType, EventSource, PowerState, Prediction, PredictorKind, PredictorSet,
};
use serde::Serialize;

use super::AppContext;

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Model to use instead of the selected one
    #[arg(long)]
    pub model: Option<PredictorKind>,
    #[arg(long)]
    pub top_k: Option<usize>,
    /// Current battery level, 0-100
    #[arg(long, default_value_t = 100)]
    pub battery: u8,
    #[arg(long)]
    pub charging: bool,
    /// Current motion state, if known
    #[arg(long)]
    pub activity: Option<ActivityType>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictionReport {
    pub model: String,
    pub has_enough_data: bool,
    pub previous_app: Option<String>,
    pub predictions: Vec<Prediction>,
}

/// Runs one prediction with predictors already trained from `store`.
pub fn build_report<S: EventSource + ?Sized>(
    ctx: &AppContext,
    args: &PredictArgs,
    predictors: &PredictorSet,
    store: &S,
) -> Result<PredictionReport> {
    let kind = args.model.unwrap_or(ctx.settings.general.selected_model);
    let top_k = args.top_k.unwrap_or(ctx.settings.prediction.top_k);
    let previous_app = store.get_last()?.map(|e| e.app);

    let context = features::build_context(
        nextapp::utils::now_millis(),
        ctx.tz,
        PowerState {
            is_charging: args.charging,
            battery_level: args.battery,
        },
        previous_app.clone(),
        args.activity,
    );

    let predictor = predictors.get(kind);
    Ok(PredictionReport {
        model: predictor.name().to_string(),
        has_enough_data: predictor.has_enough_data(),
        previous_app,
        predictions: predictor.predict(&context, top_k),
    })
}

pub fn print_report(report: &PredictionReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Model: {}", report.model);
    if !report.has_enough_data {
        println!("Collecting data: predictions use overall app frequency");
    }
    if report.predictions.is_empty() {
        println!("No prediction yet");
        return Ok(());
    }
    for (rank, prediction) in report.predictions.iter().enumerate() {
        println!(
            "{:>2}. {:<40} {:>5.1}%",
            rank + 1,
            prediction.app,
            prediction.probability * 100.0
        );
    }
    Ok(())
}

pub fn run(ctx: &AppContext, args: PredictArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let predictors = PredictorSet::from_settings(&ctx.settings)?;
    let kind = args.model.unwrap_or(ctx.settings.general.selected_model);
    predictors.get(kind).train(&store)?;

    let report = build_report(ctx, &args, &predictors, &store)?;
    print_report(&report, args.json)
}
