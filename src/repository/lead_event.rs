//! Repository implementation for the lead audit trail.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;

use crate::domain::lead_event::{LeadEvent, NewLeadEvent};
use crate::domain::user::User;
use crate::models::lead_event::{LeadEvent as DbLeadEvent, NewLeadEvent as DbNewLeadEvent};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, LeadEventListQuery, LeadEventReader, LeadEventWriter};

impl LeadEventReader for DieselRepository {
    fn list_lead_events(
        &self,
        query: LeadEventListQuery,
    ) -> RepositoryResult<(usize, Vec<(LeadEvent, User)>)> {
        use crate::schema::{lead_events, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = lead_events::table
                .filter(lead_events::lead_id.eq(query.lead_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(event_type) = &query.event_type {
                items = items.filter(lead_events::event_type.eq(event_type.to_string()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_events = items
            .order(lead_events::created_at.desc())
            .load::<DbLeadEvent>(&mut conn)?;

        // Authors are fetched in one IN query and joined in memory.
        let user_ids: Vec<i32> = {
            let set: HashSet<i32> = db_events.iter().map(|e| e.user_id).collect();
            set.into_iter().collect()
        };

        let db_users = users::table
            .filter(users::id.eq_any(user_ids))
            .load::<DbUser>(&mut conn)?;

        let user_map: HashMap<i32, DbUser> = db_users.into_iter().map(|u| (u.id, u)).collect();

        let combined: Vec<(LeadEvent, User)> = db_events
            .into_iter()
            .filter_map(|event| {
                user_map
                    .get(&event.user_id)
                    .map(|user| (event.into(), user.clone().into()))
            })
            .collect();

        Ok((total, combined))
    }
}

impl LeadEventWriter for DieselRepository {
    fn create_lead_event(&self, event: &NewLeadEvent) -> RepositoryResult<LeadEvent> {
        use crate::schema::lead_events;

        let mut conn = self.conn()?;

        let new_event: DbNewLeadEvent = event.into();

        let created = diesel::insert_into(lead_events::table)
            .values(&new_event)
            .get_result::<DbLeadEvent>(&mut conn)?;

        Ok(created.into())
    }
}
