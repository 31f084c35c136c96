use chrono::Utc;
use serde_json::json;

use buscrm::domain::enquiry::EnquiryStageData;
use buscrm::domain::lead::{ConnectionStatus, LeadStatus, Lifecycle, NewLead, UpdateLead};
use buscrm::domain::lead_event::{LeadEventType, NewLeadEvent};
use buscrm::domain::notification::NewNotification;
use buscrm::domain::user::{NewUser, UserRole};
use buscrm::repository::{
    DieselRepository, EnquiryReader, EnquiryWriter, LeadEventListQuery, LeadEventReader,
    LeadEventWriter, LeadListQuery, LeadReader, LeadWriter, NotificationReader, NotificationWriter,
    UserReader, UserWriter,
};

mod common;

fn new_lead(company: &str, user_id: Option<i32>, status: LeadStatus) -> NewLead {
    NewLead::new(
        user_id,
        company.to_string(),
        "Contact".to_string(),
        Some(format!("{}@example.com", company.to_lowercase())),
        None,
        Some("Pune".to_string()),
        Some("Referral".to_string()),
        status,
    )
}

fn seed_user(repo: &DieselRepository, name: &str) -> buscrm::domain::user::User {
    repo.create_or_update_user(&NewUser::new(
        name.to_string(),
        format!("{name}@example.com").to_lowercase(),
        UserRole::User,
    ))
    .unwrap()
}

#[test]
fn test_lead_repository_crud() {
    let test_db = common::TestDb::new("test_lead_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = seed_user(&repo, "asha");

    let created = repo
        .create_leads(&[
            new_lead("Metro", Some(user.id), LeadStatus::Hot),
            new_lead("Shuttle", None, LeadStatus::Cold),
        ])
        .unwrap();
    assert_eq!(created, 2);

    let (total, leads) = repo.list_leads(LeadListQuery::new()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(leads.len(), 2);

    let (search_total, search_items) = repo
        .list_leads(LeadListQuery::new().search("Shut"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].company, "Shuttle");

    let (mine_total, mine) = repo.list_leads(LeadListQuery::new().user(user.id)).unwrap();
    assert_eq!(mine_total, 1);
    assert_eq!(mine[0].company, "Metro");

    let metro = mine[0].clone();
    let updates = UpdateLead::new(
        "Metro Transit".to_string(),
        metro.contact_name.clone(),
        metro.email.clone(),
        None,
        metro.location.clone(),
        metro.source.clone(),
        LeadStatus::Warm,
        ConnectionStatus::Busy,
        None,
    );
    let updated = repo.update_lead(metro.id, &updates).unwrap();
    assert_eq!(updated.company, "Metro Transit");
    assert_eq!(updated.status, LeadStatus::Warm);
    assert_eq!(updated.connection_status, ConnectionStatus::Busy);

    let dead = repo.set_lead_lifecycle(metro.id, Lifecycle::Dead).unwrap();
    assert_eq!(dead.lifecycle, Lifecycle::Dead);

    let (active_total, _) = repo
        .list_leads(LeadListQuery::new().lifecycle(Lifecycle::Active))
        .unwrap();
    assert_eq!(active_total, 1);

    repo.delete_lead(metro.id).unwrap();
    assert!(repo.get_lead_by_id(metro.id).unwrap().is_none());
}

#[test]
fn test_lead_forwarding_reassigns() {
    let test_db = common::TestDb::new("test_lead_forwarding_reassigns.db");
    let repo = DieselRepository::new(test_db.pool());
    let asha = seed_user(&repo, "asha");
    let ravi = seed_user(&repo, "ravi");

    repo.create_leads(&[new_lead("Metro", Some(asha.id), LeadStatus::Hot)])
        .unwrap();
    let lead = repo.list_leads(LeadListQuery::new()).unwrap().1.remove(0);

    let forwarded = repo.forward_lead(lead.id, ravi.id).unwrap();
    assert_eq!(forwarded.user_id, Some(ravi.id));

    let (asha_total, _) = repo.list_leads(LeadListQuery::new().user(asha.id)).unwrap();
    assert_eq!(asha_total, 0);
}

#[test]
fn test_due_followups_only_cover_active_leads() {
    let test_db = common::TestDb::new("test_due_followups.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = seed_user(&repo, "asha");

    repo.create_leads(&[
        new_lead("Metro", Some(user.id), LeadStatus::Hot),
        new_lead("Shuttle", Some(user.id), LeadStatus::Warm),
        new_lead("Tours", Some(user.id), LeadStatus::Cold),
    ])
    .unwrap();
    let mut leads = repo.list_leads(LeadListQuery::new()).unwrap().1;
    leads.sort_by(|a, b| a.company.cmp(&b.company));

    let now = Utc::now().naive_utc();
    let overdue = now - chrono::Duration::hours(2);
    let upcoming = now + chrono::Duration::days(1);

    repo.set_lead_follow_up(leads[0].id, Some(overdue)).unwrap();
    repo.set_lead_follow_up(leads[1].id, Some(upcoming)).unwrap();
    repo.set_lead_follow_up(leads[2].id, Some(overdue)).unwrap();
    repo.set_lead_lifecycle(leads[2].id, Lifecycle::Dead).unwrap();

    let due = repo.list_due_followups(now).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].company, "Metro");

    // Clearing the reminder removes the lead from the next sweep.
    repo.set_lead_follow_up(leads[0].id, None).unwrap();
    assert!(repo.list_due_followups(now).unwrap().is_empty());
}

#[test]
fn test_lead_counts_for_dashboard() {
    let test_db = common::TestDb::new("test_lead_counts.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_leads(&[
        new_lead("A", None, LeadStatus::Hot),
        new_lead("B", None, LeadStatus::Hot),
        new_lead("C", None, LeadStatus::Cold),
    ])
    .unwrap();
    let lead = repo.list_leads(LeadListQuery::new()).unwrap().1.remove(0);
    repo.set_lead_lifecycle(lead.id, Lifecycle::Dead).unwrap();

    let mut by_status = repo.count_leads_by_status().unwrap();
    by_status.sort();
    assert_eq!(
        by_status,
        vec![("Cold".to_string(), 1), ("Hot".to_string(), 2)]
    );

    let mut by_lifecycle = repo.count_leads_by_lifecycle().unwrap();
    by_lifecycle.sort();
    assert_eq!(
        by_lifecycle,
        vec![("Active".to_string(), 2), ("Dead".to_string(), 1)]
    );

    let by_month = repo.count_leads_by_month().unwrap();
    assert_eq!(by_month.len(), 1);
    assert_eq!(by_month[0].1, 3);
}

#[test]
fn test_lead_event_repository_crud() {
    let test_db = common::TestDb::new("test_lead_event_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = seed_user(&repo, "asha");

    repo.create_leads(&[new_lead("Metro", Some(user.id), LeadStatus::Hot)])
        .unwrap();
    let lead = repo.list_leads(LeadListQuery::new()).unwrap().1.remove(0);

    let created = repo
        .create_lead_event(&NewLeadEvent::new(
            lead.id,
            user.id,
            LeadEventType::Remark,
            json!({"text": "called the depot manager"}),
        ))
        .unwrap();
    assert_eq!(created.event_type, LeadEventType::Remark);

    repo.create_lead_event(&NewLeadEvent::new(
        lead.id,
        user.id,
        LeadEventType::TimerLog,
        json!({"elapsed_seconds": 420, "note": ""}),
    ))
    .unwrap();

    let (total, events) = repo.list_lead_events(LeadEventListQuery::new(lead.id)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(_, author)| author.id == user.id));

    let (remarks_total, remarks) = repo
        .list_lead_events(LeadEventListQuery::new(lead.id).event_type(LeadEventType::Remark))
        .unwrap();
    assert_eq!(remarks_total, 1);
    assert_eq!(
        remarks[0].0.event_data["text"],
        json!("called the depot manager")
    );
}

#[test]
fn test_user_repository_upserts_on_email() {
    let test_db = common::TestDb::new("test_user_repository_upserts.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .create_or_update_user(&NewUser::new(
            "Asha".to_string(),
            "Asha@Example.com".to_string(),
            UserRole::User,
        ))
        .unwrap();
    assert_eq!(first.email, "asha@example.com");

    let second = repo
        .create_or_update_user(&NewUser::new(
            "Asha K".to_string(),
            "asha@example.com".to_string(),
            UserRole::Admin,
        ))
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Asha K");
    assert_eq!(second.role, UserRole::Admin);

    assert_eq!(repo.list_users().unwrap().len(), 1);
    assert!(
        repo.get_user_by_email("asha@example.com")
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_notification_repository_scoping() {
    let test_db = common::TestDb::new("test_notification_repository.db");
    let repo = DieselRepository::new(test_db.pool());
    let asha = seed_user(&repo, "asha");
    let ravi = seed_user(&repo, "ravi");

    repo.create_notifications(&[
        NewNotification::new(asha.id, "Lead forwarded to you.".to_string()),
        NewNotification::new(asha.id, "Follow-up due.".to_string()),
        NewNotification::new(ravi.id, "Lead forwarded to you.".to_string()),
    ])
    .unwrap();

    let unread = repo.list_notifications(asha.id, true).unwrap();
    assert_eq!(unread.len(), 2);

    // Ravi cannot ack Asha's notification.
    assert_eq!(
        repo.mark_notification_read(unread[0].id, ravi.id).unwrap(),
        0
    );
    assert_eq!(
        repo.mark_notification_read(unread[0].id, asha.id).unwrap(),
        1
    );
    assert_eq!(repo.list_notifications(asha.id, true).unwrap().len(), 1);

    assert_eq!(repo.mark_all_notifications_read(asha.id).unwrap(), 1);
    assert!(repo.list_notifications(asha.id, true).unwrap().is_empty());
    assert_eq!(repo.list_notifications(asha.id, false).unwrap().len(), 2);

    assert_eq!(repo.list_notifications(ravi.id, true).unwrap().len(), 1);
}

#[test]
fn test_enquiry_stages_accumulate() {
    let test_db = common::TestDb::new("test_enquiry_stages.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = seed_user(&repo, "asha");

    repo.create_leads(&[new_lead("Metro", Some(user.id), LeadStatus::Hot)])
        .unwrap();
    let lead = repo.list_leads(LeadListQuery::new()).unwrap().1.remove(0);

    assert!(repo.get_enquiry_by_lead(lead.id).unwrap().is_none());

    let after_body = repo
        .save_enquiry_stage(
            lead.id,
            &EnquiryStageData::Body {
                bus_type: "Staff".to_string(),
                seating_capacity: 40,
                application: Some("Employee transport".to_string()),
            },
        )
        .unwrap();
    assert_eq!(after_body.stage, 1);
    assert_eq!(after_body.bus_type.as_deref(), Some("Staff"));
    assert!(!after_body.is_complete());
    assert!(!after_body.reference.is_empty());

    let after_chassis = repo
        .save_enquiry_stage(
            lead.id,
            &EnquiryStageData::Chassis {
                chassis_model: "LP 912".to_string(),
                body_length_mm: Some(9000),
                body_width_mm: Some(2400),
            },
        )
        .unwrap();
    assert_eq!(after_chassis.stage, 2);
    assert_eq!(after_chassis.reference, after_body.reference);
    // Stage 1 data survives stage 2 saves.
    assert_eq!(after_chassis.seating_capacity, Some(40));

    let after_fitout = repo
        .save_enquiry_stage(
            lead.id,
            &EnquiryStageData::FitOut {
                seat_type: Some("2x2 pushback".to_string()),
                air_conditioning: true,
                luggage_carrier: false,
                special_requirements: None,
            },
        )
        .unwrap();
    assert_eq!(after_fitout.stage, 3);
    assert!(after_fitout.is_complete());
    assert!(after_fitout.air_conditioning);

    // Re-saving an earlier stage never lowers the high-water mark.
    let resaved = repo
        .save_enquiry_stage(
            lead.id,
            &EnquiryStageData::Body {
                bus_type: "Tourist".to_string(),
                seating_capacity: 45,
                application: None,
            },
        )
        .unwrap();
    assert_eq!(resaved.stage, 3);
    assert_eq!(resaved.bus_type.as_deref(), Some("Tourist"));
}

#[test]
fn test_deleting_a_lead_removes_its_children() {
    let test_db = common::TestDb::new("test_delete_lead_children.db");
    let repo = DieselRepository::new(test_db.pool());
    let user = seed_user(&repo, "asha");

    repo.create_leads(&[new_lead("Metro", Some(user.id), LeadStatus::Hot)])
        .unwrap();
    let lead = repo.list_leads(LeadListQuery::new()).unwrap().1.remove(0);

    repo.create_lead_event(&NewLeadEvent::new(
        lead.id,
        user.id,
        LeadEventType::Note,
        json!({"text": "initial call"}),
    ))
    .unwrap();
    repo.save_enquiry_stage(
        lead.id,
        &EnquiryStageData::Body {
            bus_type: "Staff".to_string(),
            seating_capacity: 32,
            application: None,
        },
    )
    .unwrap();

    repo.delete_lead(lead.id).unwrap();

    assert!(repo.get_lead_by_id(lead.id).unwrap().is_none());
    assert!(repo.get_enquiry_by_lead(lead.id).unwrap().is_none());
    let (events_total, _) = repo.list_lead_events(LeadEventListQuery::new(lead.id)).unwrap();
    assert_eq!(events_total, 0);
}

#[test]
fn test_lead_pagination() {
    let test_db = common::TestDb::new("test_lead_pagination.db");
    let repo = DieselRepository::new(test_db.pool());

    let batch: Vec<NewLead> = (0..25)
        .map(|i| new_lead(&format!("Company{i:02}"), None, LeadStatus::Warm))
        .collect();
    repo.create_leads(&batch).unwrap();

    let (total, page1) = repo
        .list_leads(LeadListQuery::new().paginate(1, 10))
        .unwrap();
    assert_eq!(total, 25);
    assert_eq!(page1.len(), 10);

    let (_, page3) = repo
        .list_leads(LeadListQuery::new().paginate(3, 10))
        .unwrap();
    assert_eq!(page3.len(), 5);
}
