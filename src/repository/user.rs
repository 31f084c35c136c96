//! Repository implementation for sales users.

use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::user::{NewUser, User};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table.find(id).first::<DbUser>(&mut conn).optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let users = users::table
            .order(users::name.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(users)
    }
}

impl UserWriter for DieselRepository {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let db_new_user: DbNewUser = new_user.into();

        let db_user = diesel::insert_into(users::table)
            .values(&db_new_user)
            .on_conflict(users::email)
            .do_update()
            .set((
                users::name.eq(excluded(users::name)),
                users::role.eq(excluded(users::role)),
            ))
            .get_result::<DbUser>(&mut conn)?;

        Ok(db_user.into())
    }
}
