use anyhow::Result;
use clap::Subcommand;
use nextapp::utils::config;
use nextapp::PredictorKind;

use super::AppContext;

#[derive(Subcommand, Debug)]
pub enum ModelAction {
    /// Show the selected model
    Show,
    /// Switch to the other model
    Switch,
    /// Select a model by name
    Set { model: PredictorKind },
}

pub fn run(ctx: &mut AppContext, action: ModelAction) -> Result<()> {
    let current = ctx.settings.general.selected_model;
    let next = match action {
        ModelAction::Show => {
            println!("{}", current);
            return Ok(());
        }
        ModelAction::Switch => current.toggled(),
        ModelAction::Set { model } => model,
    };

    select_model(ctx, next)?;
    println!("Selected model: {}", next);
    Ok(())
}

/// Persists the model choice so the next run starts with it.
pub fn select_model(ctx: &mut AppContext, kind: PredictorKind) -> Result<()> {
    ctx.settings.general.selected_model = kind;
    config::save_settings(&ctx.settings_path, &ctx.settings)?;
    log::info!("[Settings] Selected model saved: {}", kind);
    Ok(())
}

pub fn show_settings(ctx: &AppContext) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
    Ok(())
}
