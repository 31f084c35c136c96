//! Repository implementation for leads.

use diesel::prelude::*;
use diesel::sql_query;

use crate::domain::lead::{Lead, Lifecycle, NewLead, UpdateLead};
use crate::models::lead::{
    Lead as DbLead, MonthlyLeadCount, NewLead as DbNewLead, UpdateLead as DbUpdateLead,
};
use crate::repository::{DieselRepository, LeadListQuery, LeadReader, LeadWriter};
use crate::repository::errors::RepositoryResult;

impl LeadReader for DieselRepository {
    fn get_lead_by_id(&self, id: i32) -> RepositoryResult<Option<Lead>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let lead = leads::table.find(id).first::<DbLead>(&mut conn).optional()?;

        Ok(lead.map(Into::into))
    }

    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)> {
        use crate::schema::leads;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = leads::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(user_id) = query.user_id {
                items = items.filter(leads::user_id.eq(user_id));
            }
            if let Some(status) = query.status {
                items = items.filter(leads::status.eq(status.to_string()));
            }
            if let Some(lifecycle) = query.lifecycle {
                items = items.filter(leads::lifecycle.eq(lifecycle.to_string()));
            }
            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    leads::company
                        .like(pattern.clone())
                        .or(leads::contact_name.like(pattern.clone()))
                        .or(leads::email.like(pattern.clone()))
                        .or(leads::phone.like(pattern.clone()))
                        .or(leads::location.like(pattern)),
                );
            }
            if let Some((from, to)) = query.edited_between {
                items = items
                    .filter(leads::updated_at.ge(from))
                    .filter(leads::updated_at.le(to));
            }
            items
        };

        // Total before pagination is applied.
        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let leads = items
            .order(leads::updated_at.desc())
            .load::<DbLead>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect::<Vec<Lead>>();

        Ok((total, leads))
    }

    fn list_due_followups(
        &self,
        now: chrono::NaiveDateTime,
    ) -> RepositoryResult<Vec<Lead>> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let due = leads::table
            .filter(leads::lifecycle.eq(Lifecycle::Active.to_string()))
            .filter(leads::next_follow_up.le(now))
            .order(leads::next_follow_up.asc())
            .load::<DbLead>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(due)
    }

    fn count_leads_by_status(&self) -> RepositoryResult<Vec<(String, i64)>> {
        use crate::schema::leads;
        use diesel::dsl::count_star;

        let mut conn = self.conn()?;
        let counts = leads::table
            .group_by(leads::status)
            .select((leads::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(counts)
    }

    fn count_leads_by_lifecycle(&self) -> RepositoryResult<Vec<(String, i64)>> {
        use crate::schema::leads;
        use diesel::dsl::count_star;

        let mut conn = self.conn()?;
        let counts = leads::table
            .group_by(leads::lifecycle)
            .select((leads::lifecycle, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(counts)
    }

    fn count_leads_by_month(&self) -> RepositoryResult<Vec<(String, i64)>> {
        let mut conn = self.conn()?;

        let rows = sql_query(
            "SELECT strftime('%Y-%m', created_at) AS month, COUNT(*) AS count \
             FROM leads GROUP BY month ORDER BY month",
        )
        .load::<MonthlyLeadCount>(&mut conn)?;

        Ok(rows.into_iter().map(|r| (r.month, r.count)).collect())
    }
}

impl LeadWriter for DieselRepository {
    fn create_leads(&self, new_leads: &[NewLead]) -> RepositoryResult<usize> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewLead> = new_leads.iter().map(Into::into).collect();
        let affected = diesel::insert_into(leads::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_lead(&self, lead_id: i32, updates: &UpdateLead) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateLead = updates.into();

        let updated = diesel::update(leads::table.find(lead_id))
            .set(&db_updates)
            .get_result::<DbLead>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_lead_lifecycle(&self, lead_id: i32, lifecycle: Lifecycle) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let updated = diesel::update(leads::table.find(lead_id))
            .set((
                leads::lifecycle.eq(lifecycle.to_string()),
                leads::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbLead>(&mut conn)?;

        Ok(updated.into())
    }

    fn forward_lead(&self, lead_id: i32, to_user_id: i32) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let updated = diesel::update(leads::table.find(lead_id))
            .set((
                leads::user_id.eq(Some(to_user_id)),
                leads::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbLead>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_lead_follow_up(
        &self,
        lead_id: i32,
        due: Option<chrono::NaiveDateTime>,
    ) -> RepositoryResult<Lead> {
        use crate::schema::leads;

        let mut conn = self.conn()?;
        let updated = diesel::update(leads::table.find(lead_id))
            .set((
                leads::next_follow_up.eq(due),
                leads::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbLead>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_lead(&self, lead_id: i32) -> RepositoryResult<()> {
        use crate::schema::{enquiries, lead_events, leads};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::delete(lead_events::table.filter(lead_events::lead_id.eq(lead_id)))
                .execute(conn)?;
            diesel::delete(enquiries::table.filter(enquiries::lead_id.eq(lead_id)))
                .execute(conn)?;
            diesel::delete(leads::table.find(lead_id)).execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }
}
