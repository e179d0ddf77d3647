//! Action -> command translation
//!
//! Pure and total: every action variant has exactly one command.

use crate::planning::plan::{Action, Command, Plan, RecruitPriority};

/// Share of the army committed to any attack
pub const ATTACK_FORCE_PERCENTAGE: f64 = 0.6;

pub fn translate(action: &Action) -> Command {
    match action {
        Action::Build { target, intensity } => Command::BuildBuildings {
            building_type: *target,
            budget_percentage: intensity.clamp(0.0, 1.0) * 100.0,
        },
        Action::Recruit {
            unit_class,
            priority,
        } => Command::HireArmy {
            focus_class: *unit_class,
            resource_percentage: match priority {
                RecruitPriority::High => 0.4,
                RecruitPriority::Medium | RecruitPriority::Low => 0.2,
            },
        },
        Action::Attack {
            target_faction,
            target_city,
        } => Command::AttackCity {
            city: target_city.clone(),
            faction: target_faction.clone(),
            force_percentage: ATTACK_FORCE_PERCENTAGE,
        },
        Action::Diplomacy {
            action,
            with_faction,
        } => Command::DiplomaticAction {
            action: *action,
            target_faction: with_faction.clone(),
        },
    }
}

pub fn translate_plan(plan: &Plan) -> Vec<Command> {
    plan.actions.iter().map(translate).collect()
}
