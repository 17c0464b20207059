use diesel::{dsl, ExpressionMethods, QueryDsl, RunQueryDsl};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use crate::db::{DaoError, DbConnection, DbThreadPool};
use crate::models::user::{NewUser, User};
use crate::schema::users as user_fields;
use crate::schema::users::dsl::users;
use crate::types::UserRole;

pub struct Dao {
    db_connection: Option<Rc<RefCell<DbConnection>>>,
    db_thread_pool: DbThreadPool,
}

impl Dao {
    pub fn new(db_thread_pool: &DbThreadPool) -> Self {
        Self {
            db_connection: None,
            db_thread_pool: db_thread_pool.clone(),
        }
    }

    fn get_connection(&mut self) -> Result<Rc<RefCell<DbConnection>>, DaoError> {
        if let Some(conn) = &self.db_connection {
            Ok(Rc::clone(conn))
        } else {
            let conn = Rc::new(RefCell::new(self.db_thread_pool.get()?));
            self.db_connection = Some(Rc::clone(&conn));
            Ok(conn)
        }
    }

    pub fn get_user_by_email(&mut self, user_email: &str) -> Result<User, DaoError> {
        Ok(users
            .filter(user_fields::email.eq(user_email.to_lowercase()))
            .first::<User>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn create_user(
        &mut self,
        email: &str,
        password_hash: &str,
        preferred_currency: &str,
    ) -> Result<User, DaoError> {
        let email = email.to_lowercase();

        let new_user = NewUser {
            id: Uuid::new_v4(),
            email: &email,
            password_hash,
            role: UserRole::User,
            preferred_currency,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let db_connection = self.get_connection()?;
        let mut db_connection = db_connection.borrow_mut();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let existing_count = users
                    .filter(user_fields::email.eq(&email))
                    .count()
                    .get_result::<i64>(conn)?;

                if existing_count != 0 {
                    return Err(DaoError::AlreadyExists("User already exists."));
                }

                Ok(dsl::insert_into(users)
                    .values(&new_user)
                    .get_result::<User>(conn)?)
            })
    }
}
