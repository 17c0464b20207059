use chrono::NaiveDate;
use diesel::{dsl, ExpressionMethods, QueryDsl, RunQueryDsl};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use crate::db::{DaoError, DbConnection, DbThreadPool, UserScope};
use crate::models::goal::{Goal, NewGoal};
use crate::request_io::InputGoal;
use crate::schema::goals as goal_fields;
use crate::schema::goals::dsl::goals;
use crate::types::DEFAULT_CURRENCY;

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

    pub fn create_goal(
        &mut self,
        goal_data: &InputGoal,
        user_email: &str,
    ) -> Result<Goal, DaoError> {
        let new_goal = NewGoal {
            id: Uuid::new_v4(),
            user_email,
            title: &goal_data.title,
            target_amount_cents: goal_data.target_amount_cents,
            saved_amount_cents: 0,
            deadline: goal_data.deadline,
            auto_save_percentage: goal_data.auto_save_percentage,
            priority_level: goal_data.priority_level.unwrap_or(1),
            currency: goal_data.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            created_at: chrono::Utc::now().naive_utc(),
        };

        Ok(dsl::insert_into(goals)
            .values(&new_goal)
            .get_result::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_goals(&mut self, scope: &UserScope) -> Result<Vec<Goal>, DaoError> {
        let mut query = goals.into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(goal_fields::user_email.eq(email));
        }

        Ok(query
            .order(goal_fields::created_at.desc())
            .load::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    /// Goals in the order the auto-save engine considers them.
    pub fn get_goals_for_allocation(&mut self, user_email: &str) -> Result<Vec<Goal>, DaoError> {
        Ok(goals
            .filter(goal_fields::user_email.eq(user_email))
            .order((
                goal_fields::priority_level.asc(),
                goal_fields::created_at.asc(),
            ))
            .load::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_goal(&mut self, goal_id: Uuid, user_email: &str) -> Result<Goal, DaoError> {
        Ok(goals
            .find(goal_id)
            .filter(goal_fields::user_email.eq(user_email))
            .first::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn set_saved_amount(
        &mut self,
        goal_id: Uuid,
        user_email: &str,
        saved_amount_cents: i64,
    ) -> Result<Goal, DaoError> {
        Ok(diesel::update(
            goals
                .find(goal_id)
                .filter(goal_fields::user_email.eq(user_email)),
        )
        .set(goal_fields::saved_amount_cents.eq(saved_amount_cents))
        .get_result::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn delete_goal(&mut self, goal_id: Uuid, user_email: &str) -> Result<Goal, DaoError> {
        Ok(diesel::delete(
            goals
                .find(goal_id)
                .filter(goal_fields::user_email.eq(user_email)),
        )
        .get_result::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    /// Unfinished goals whose deadline falls on or before `before_date`.
    pub fn get_goals_with_deadline_before(
        &mut self,
        before_date: NaiveDate,
    ) -> Result<Vec<Goal>, DaoError> {
        Ok(goals
            .filter(goal_fields::deadline.le(before_date))
            .filter(goal_fields::saved_amount_cents.lt(goal_fields::target_amount_cents))
            .order(goal_fields::deadline.asc())
            .load::<Goal>(&mut *(self.get_connection()?).borrow_mut())?)
    }
}
