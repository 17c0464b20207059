use diesel::{dsl, BoolExpressionMethods, ExpressionMethods, QueryDsl, RunQueryDsl};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use crate::db::{DaoError, DbConnection, DbThreadPool, UserScope};
use crate::models::budget::{Budget, NewBudget};
use crate::schema::budgets as budget_fields;
use crate::schema::budgets::dsl::budgets;
use crate::types::{Category, Month};

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

    /// One budget per (user, category, month). The duplicate check and the
    /// insert run in the same database transaction.
    pub fn create_budget(
        &mut self,
        user_email: &str,
        amount_cents: i64,
        category: Option<Category>,
        month: Month,
        currency: &str,
    ) -> Result<Budget, DaoError> {
        let new_budget = NewBudget {
            id: Uuid::new_v4(),
            user_email,
            amount_cents,
            category,
            month,
            currency,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let db_connection = self.get_connection()?;
        let mut db_connection = db_connection.borrow_mut();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let mut duplicate_query = budgets
                    .filter(budget_fields::user_email.eq(user_email))
                    .filter(budget_fields::month.eq(month))
                    .into_boxed();

                duplicate_query = match category {
                    Some(c) => duplicate_query.filter(budget_fields::category.eq(c)),
                    None => duplicate_query.filter(budget_fields::category.is_null()),
                };

                let existing_count = duplicate_query.count().get_result::<i64>(conn)?;

                if existing_count != 0 {
                    return Err(DaoError::AlreadyExists(
                        "Budget for this category already exists for the selected month.",
                    ));
                }

                Ok(dsl::insert_into(budgets)
                    .values(&new_budget)
                    .get_result::<Budget>(conn)?)
            })
    }

    pub fn get_budget(
        &mut self,
        user_email: &str,
        category: Option<Category>,
        month: Month,
    ) -> Result<Budget, DaoError> {
        let mut query = budgets
            .filter(budget_fields::user_email.eq(user_email))
            .filter(budget_fields::month.eq(month))
            .into_boxed();

        query = match category {
            Some(c) => query.filter(budget_fields::category.eq(c)),
            None => query.filter(budget_fields::category.is_null()),
        };

        Ok(query.first::<Budget>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_budgets(&mut self, scope: &UserScope) -> Result<Vec<Budget>, DaoError> {
        let mut query = budgets.into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(budget_fields::user_email.eq(email));
        }

        Ok(query
            .order(budget_fields::created_at.desc())
            .load::<Budget>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_budgets_for_month(
        &mut self,
        user_email: &str,
        month: Month,
    ) -> Result<Vec<Budget>, DaoError> {
        Ok(budgets
            .filter(
                budget_fields::user_email
                    .eq(user_email)
                    .and(budget_fields::month.eq(month)),
            )
            .order(budget_fields::created_at.asc())
            .load::<Budget>(&mut *(self.get_connection()?).borrow_mut())?)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    use rand::prelude::*;

    use crate::db::user;
    use crate::test_env;

    pub fn generate_user_email() -> Result<String, DaoError> {
        let db_thread_pool = &*test_env::DB_THREAD_POOL;

        let user_number = rand::thread_rng().gen_range::<u128, _>(u128::MIN..u128::MAX);
        let email = format!("test_user{user_number}@test.com");

        user::Dao::new(db_thread_pool).create_user(
            &email,
            "$argon2id$v=19$m=128,t=2,p=2$dGVzdHNhbHQ$dGVzdGhhc2g",
            "USD",
        )?;

        Ok(email)
    }

    #[test]
    #[ignore]
    fn test_create_budget_rejects_duplicate_category_and_month() {
        let db_thread_pool = &*test_env::DB_THREAD_POOL;
        let mut dao = Dao::new(db_thread_pool);

        let email = generate_user_email().unwrap();

        let created = dao
            .create_budget(&email, 50_000, Some(Category::Food), Month::March, "USD")
            .unwrap();
        assert_eq!(created.amount_cents, 50_000);

        let duplicate =
            dao.create_budget(&email, 70_000, Some(Category::Food), Month::March, "USD");
        assert!(matches!(duplicate, Err(DaoError::AlreadyExists(_))));

        // A different month or category is a separate budget.
        dao.create_budget(&email, 70_000, Some(Category::Food), Month::April, "USD")
            .unwrap();
        dao.create_budget(&email, 20_000, Some(Category::Bills), Month::March, "USD")
            .unwrap();

        let march_budgets = dao.get_budgets_for_month(&email, Month::March).unwrap();
        assert_eq!(march_budgets.len(), 2);
    }

    #[test]
    #[ignore]
    fn test_create_budget_rejects_duplicate_overall_budget() {
        let db_thread_pool = &*test_env::DB_THREAD_POOL;
        let mut dao = Dao::new(db_thread_pool);

        let email = generate_user_email().unwrap();

        dao.create_budget(&email, 200_000, None, Month::March, "USD")
            .unwrap();

        let duplicate = dao.create_budget(&email, 250_000, None, Month::March, "USD");
        assert!(matches!(duplicate, Err(DaoError::AlreadyExists(_))));

        let overall = dao.get_budget(&email, None, Month::March).unwrap();
        assert_eq!(overall.amount_cents, 200_000);
    }
}
