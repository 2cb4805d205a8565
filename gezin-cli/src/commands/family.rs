use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use gezin_core::views::family::group_by_type;
use gezin_core::{FamilyMember, FamilyMemberPatch, MemberType, NewFamilyMember};
use owo_colors::OwoColorize;

use super::{clearable_date, not_found};
use crate::App;
use crate::render::Render;
use crate::utils::tui::confirm;

#[derive(Subcommand)]
pub enum FamilyCommand {
    /// List members grouped by type
    List,
    /// Add a family member
    Add {
        name: String,
        /// child, parent, grandparent or babysitter
        #[arg(short = 't', long = "type")]
        member_type: MemberType,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        /// Display color as #rrggbb
        #[arg(long)]
        color: Option<String>,
    },
    /// Change a family member
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short = 't', long = "type")]
        member_type: Option<MemberType>,
        /// YYYY-MM-DD, or "" to clear
        #[arg(long)]
        birth_date: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a family member
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &mut App, cmd: FamilyCommand) -> Result<()> {
    match cmd {
        FamilyCommand::List => {
            let groups = group_by_type(app.records::<FamilyMember>());
            if groups.is_empty() {
                println!("{}", "No family members yet".dimmed());
            }
            for (i, (member_type, members)) in groups.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", member_type.as_str().bold());
                for member in members {
                    println!("  {}", member.render());
                }
            }
        }
        FamilyCommand::Add {
            name,
            member_type,
            birth_date,
            color,
        } => {
            let mut draft = NewFamilyMember::new(name, member_type);
            draft.birth_date = birth_date;
            if let Some(color) = color {
                draft.color = color;
            }
            let member = app.add::<FamilyMember>(draft).await?;
            println!("Added {}", member.render());
        }
        FamilyCommand::Update {
            id,
            name,
            member_type,
            birth_date,
            color,
        } => {
            let patch = FamilyMemberPatch {
                name,
                member_type,
                birth_date: clearable_date(birth_date)?,
                color,
            };
            let member = app
                .update::<FamilyMember>(&id, patch)
                .await?
                .ok_or_else(|| not_found("family member", &id))?;
            println!("Updated {}", member.render());
        }
        FamilyCommand::Delete { id, yes } => {
            let name = app
                .find::<FamilyMember>(&id)
                .map(|m| m.name.clone())
                .ok_or_else(|| not_found("family member", &id))?;
            if confirm(format!("Delete {name}?"), yes)? {
                app.delete::<FamilyMember>(&id).await?;
                println!("Deleted {name}");
            }
        }
    }

    Ok(())
}
