//! Employee profile commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owen_core::TenantId;
use owen_store::EmployeeRepo;
use serde_json::json;

use super::open_registry;

#[derive(Parser, Debug)]
pub struct EmployeeArgs {
    #[command(subcommand)]
    pub command: EmployeeCommands,
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// Show basic details, work experience, education and languages
    Show(ShowArgs),
    /// List the languages employees can pick from
    Languages(LanguagesArgs),
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Tenant (company) id from the config file
    #[arg(long, short)]
    pub tenant: i64,

    /// Employee id
    #[arg(long)]
    pub id: i64,

    /// Print JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct LanguagesArgs {
    /// Tenant (company) id from the config file
    #[arg(long, short)]
    pub tenant: i64,
}

pub async fn run_employee(args: EmployeeArgs) -> Result<()> {
    let (_config, registry) = open_registry()?;
    let repo = EmployeeRepo::new(&registry);

    match args.command {
        EmployeeCommands::Show(args) => {
            let tenant = TenantId(args.tenant);
            let details = repo
                .basic_details(tenant, args.id)
                .await
                .with_context(|| format!("Failed to load employee {} for tenant {}", args.id, tenant))?;
            let experience = repo
                .work_experience(tenant, args.id)
                .await
                .context("Failed to load work experience")?;
            let education = repo
                .education(tenant, args.id)
                .await
                .context("Failed to load education")?;
            let languages = repo
                .languages(tenant, args.id)
                .await
                .context("Failed to load languages")?;

            if args.json {
                let profile = json!({
                    "basic": details,
                    "work_experience": experience,
                    "education": education,
                    "languages": languages,
                });
                println!("{}", serde_json::to_string_pretty(&profile)?);
                return Ok(());
            }

            println!(
                "{} {} {} ({})",
                details.salutation, details.first_name, details.last_name, details.company_employee_id
            );
            println!("  {} / {} / {}", details.function, details.designation, details.location);
            println!("  {}  {}", details.email_id, details.phone);

            if !experience.is_empty() {
                println!("\nWork experience:");
                for entry in &experience {
                    let until = entry
                        .end_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "present".to_string());
                    println!(
                        "  {} .. {}  {} at {}  {}",
                        entry.start_date, until, entry.designation, entry.company_name, entry.duration
                    );
                }
            }
            if !education.is_empty() {
                println!("\nEducation:");
                for entry in &education {
                    println!("  {}  {}, {}", entry.start_date, entry.certification, entry.institution);
                }
            }
            if !languages.is_empty() {
                let names: Vec<&str> = languages.iter().map(|l| l.language_name.as_str()).collect();
                println!("\nLanguages: {}", names.join(", "));
            }
        }
        EmployeeCommands::Languages(args) => {
            let languages = repo
                .language_master(TenantId(args.tenant))
                .await
                .context("Failed to load language list")?;
            let mut languages: Vec<_> = languages.into_iter().collect();
            languages.sort();
            for (id, name) in languages {
                println!("{:>5}  {}", id, name);
            }
        }
    }
    Ok(())
}
