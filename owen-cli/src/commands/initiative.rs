//! Initiative inspection and lifecycle commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owen_core::{Initiative, InitiativeCategory, InitiativeQuery, InitiativeStatus, TenantId};
use owen_store::{InitiativeRepo, NoMetrics};

use super::open_registry;

#[derive(Parser, Debug)]
pub struct InitiativeArgs {
    #[command(subcommand)]
    pub command: InitiativeCommands,
}

#[derive(Subcommand, Debug)]
pub enum InitiativeCommands {
    /// Show one initiative with its audience and owners
    Get(GetArgs),
    /// List initiatives of one category
    List(ListArgs),
    /// Mark an initiative as completed
    Complete(TargetArgs),
    /// Soft-delete an initiative (it stays in the graph as Deleted)
    Delete(TargetArgs),
    /// Show the initiative type names for a category
    Types(TypesArgs),
}

#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Tenant (company) id from the config file
    #[arg(long, short)]
    pub tenant: i64,

    /// Initiative id
    #[arg(long)]
    pub id: i64,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Tenant (company) id from the config file
    #[arg(long, short)]
    pub tenant: i64,

    /// Initiative category: team or individual
    #[arg(long, short)]
    pub category: InitiativeCategory,

    /// Only initiatives in this status (deleted ones are hidden otherwise)
    #[arg(long, short)]
    pub status: Option<InitiativeStatus>,

    /// Only initiatives of this type id
    #[arg(long)]
    pub type_id: Option<i64>,

    /// Print JSON instead of one line per initiative
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct TypesArgs {
    /// Tenant (company) id from the config file
    #[arg(long, short)]
    pub tenant: i64,

    /// Initiative category: team or individual
    #[arg(long, short)]
    pub category: InitiativeCategory,
}

pub async fn run_initiative(args: InitiativeArgs) -> Result<()> {
    let (_config, registry) = open_registry()?;
    let repo = InitiativeRepo::new(&registry, &NoMetrics);

    match args.command {
        InitiativeCommands::Get(args) => {
            let tenant = TenantId(args.target.tenant);
            let initiative = repo
                .get(tenant, args.target.id)
                .await
                .with_context(|| format!("Failed to load initiative {} for tenant {}", args.target.id, tenant))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&initiative)?);
            } else {
                print_initiative(&initiative);
            }
        }
        InitiativeCommands::List(args) => {
            let tenant = TenantId(args.tenant);
            let mut query = InitiativeQuery::category(args.category);
            if let Some(status) = args.status {
                query = query.with_status(status);
            }
            if let Some(type_id) = args.type_id {
                query = query.with_type(type_id);
            }
            let initiatives = repo
                .list(tenant, &query)
                .await
                .with_context(|| format!("Failed to list initiatives for tenant {}", tenant))?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&initiatives)?);
            } else if initiatives.is_empty() {
                println!("No {} initiatives found", args.category);
            } else {
                for initiative in &initiatives {
                    println!(
                        "{:>5}  {:<10} {:<30} type {}",
                        initiative.id, initiative.status, initiative.name, initiative.type_id
                    );
                }
            }
        }
        InitiativeCommands::Complete(args) => {
            let tenant = TenantId(args.tenant);
            repo.complete(tenant, args.id)
                .await
                .with_context(|| format!("Failed to complete initiative {}", args.id))?;
            println!("✅ Initiative {} completed", args.id);
        }
        InitiativeCommands::Delete(args) => {
            let tenant = TenantId(args.tenant);
            repo.delete(tenant, args.id)
                .await
                .with_context(|| format!("Failed to delete initiative {}", args.id))?;
            println!("🗑️  Initiative {} deleted", args.id);
        }
        InitiativeCommands::Types(args) => {
            let tenant = TenantId(args.tenant);
            let types = repo
                .initiative_type_map(tenant, args.category)
                .await
                .with_context(|| format!("Failed to load {} initiative types", args.category))?;
            let mut types: Vec<_> = types.into_iter().collect();
            types.sort();
            for (id, name) in types {
                println!("{:>5}  {}", id, name);
            }
        }
    }
    Ok(())
}

fn print_initiative(initiative: &Initiative) {
    let date = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!("#{} {}", initiative.id, initiative.name);
    println!("  category:   {}", initiative.category());
    println!("  status:     {}", initiative.status);
    println!("  type:       {}", initiative.type_id);
    println!(
        "  runs:       {} .. {}",
        date(initiative.start_date),
        date(initiative.end_date)
    );
    println!("  created by: {} on {}", initiative.created_by, date(initiative.created_on));
    if !initiative.comment.is_empty() {
        println!("  comment:    {}", initiative.comment);
    }

    let employees = initiative.audience.employees();
    if !employees.is_empty() {
        println!("  employees:  {:?}", employees);
    }
    for filter in initiative.audience.filters() {
        let values: Vec<&str> = filter.values.values().map(String::as_str).collect();
        println!("  {:<11} {}", format!("{}:", filter.name), values.join(", "));
    }
    if !initiative.owners.is_empty() {
        println!("  owners:     {:?}", initiative.owners);
    }
    for metric in &initiative.metrics {
        println!("  metric:     {} = {}", metric.name, metric.score);
    }
}
