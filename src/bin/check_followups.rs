//! Scheduled sweep notifying reps about follow-ups that have come due.
//!
//! Intended to run from cron. Every active lead whose `next_follow_up` is in
//! the past produces one notification for its assigned rep; the reminder is
//! then cleared so the next run does not repeat it.

use std::env;

use chrono::Utc;
use config::Config;
use dotenvy::dotenv;

use buscrm::domain::notification::NewNotification;
use buscrm::models::config::ServerConfig;
use buscrm::repository::errors::RepositoryResult;
use buscrm::repository::{DieselRepository, LeadReader, LeadWriter, NotificationWriter};

fn sweep_followups<R>(repo: &R, now: chrono::NaiveDateTime) -> RepositoryResult<usize>
where
    R: LeadReader + LeadWriter + NotificationWriter,
{
    let due = repo.list_due_followups(now)?;

    let mut notified = 0;
    for lead in due {
        let Some(user_id) = lead.user_id else {
            log::warn!("Skipping unassigned lead {} with a due follow-up", lead.id);
            continue;
        };

        let notification = NewNotification::new(
            user_id,
            format!("Follow-up due for lead \"{}\".", lead.company),
        );

        repo.create_notifications(&[notification])?;
        repo.set_lead_follow_up(lead.id, None)?;
        notified += 1;

        log::info!("Notified user {} about lead {}", user_id, lead.id);
    }

    Ok(notified)
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {}", err);
            std::process::exit(1);
        }
    };

    let repo = match DieselRepository::connect(&server_config.database_url) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };

    match sweep_followups(&repo, Utc::now().naive_utc()) {
        Ok(notified) => log::info!("Follow-up sweep finished, {notified} reps notified"),
        Err(err) => {
            log::error!("Follow-up sweep failed: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buscrm::domain::lead::{ConnectionStatus, Lead, LeadStatus, Lifecycle};
    use buscrm::repository::mock::MockRepository;

    fn due_lead(id: i32, user_id: Option<i32>) -> Lead {
        let now = Utc::now().naive_utc();
        Lead {
            id,
            user_id,
            company: format!("Company {id}"),
            contact_name: "Contact".to_string(),
            email: None,
            phone: None,
            location: None,
            source: None,
            status: LeadStatus::Warm,
            connection_status: ConnectionStatus::Connected,
            lifecycle: Lifecycle::Active,
            next_follow_up: Some(now - chrono::Duration::hours(1)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sweep_notifies_assigned_reps_and_clears_reminders() {
        let mut repo = MockRepository::new();
        let now = Utc::now().naive_utc();

        repo.expect_list_due_followups()
            .times(1)
            .returning(|_| Ok(vec![due_lead(1, Some(7)), due_lead(2, Some(8))]));

        repo.expect_create_notifications()
            .times(2)
            .withf(|notifications| {
                notifications.len() == 1
                    && notifications[0].message.starts_with("Follow-up due for lead")
            })
            .returning(|n| Ok(n.len()));

        repo.expect_set_lead_follow_up()
            .times(2)
            .withf(|_, due| due.is_none())
            .returning(|id, _| {
                let mut lead = due_lead(id, Some(7));
                lead.next_follow_up = None;
                Ok(lead)
            });

        let notified = sweep_followups(&repo, now).expect("sweep failed");
        assert_eq!(notified, 2);
    }

    #[test]
    fn sweep_skips_unassigned_leads() {
        let mut repo = MockRepository::new();
        let now = Utc::now().naive_utc();

        repo.expect_list_due_followups()
            .times(1)
            .returning(|_| Ok(vec![due_lead(1, None)]));

        repo.expect_create_notifications().times(0);
        repo.expect_set_lead_follow_up().times(0);

        let notified = sweep_followups(&repo, now).expect("sweep failed");
        assert_eq!(notified, 0);
    }
}
