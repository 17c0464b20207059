use chrono::NaiveDate;
use diesel::{dsl, ExpressionMethods, PgArrayExpressionMethods, QueryDsl, RunQueryDsl};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use crate::allocation::AllocationPlan;
use crate::db::{DaoError, DbConnection, DbThreadPool, UserScope};
use crate::models::goal::Goal;
use crate::models::transaction::{NewTransaction, Transaction, TransactionChanges};
use crate::request_io::InputTransaction;
use crate::schema::goals as goal_fields;
use crate::schema::goals::dsl::goals;
use crate::schema::transactions as transaction_fields;
use crate::schema::transactions::dsl::transactions;
use crate::types::{Category, TransactionKind};

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

    pub fn create_transaction(
        &mut self,
        transaction_data: &InputTransaction,
        user_email: &str,
        currency: &str,
    ) -> Result<Transaction, DaoError> {
        let new_transaction = NewTransaction {
            id: Uuid::new_v4(),
            user_email,
            kind: transaction_data.kind,
            amount_cents: transaction_data.amount_cents,
            category: transaction_data.category,
            tags: transaction_data.tags.clone(),
            transaction_date: transaction_data.transaction_date,
            description: transaction_data.description.as_deref(),
            is_recurring: transaction_data.is_recurring,
            recurring_frequency: transaction_data.recurring_frequency,
            auto_save: transaction_data.auto_save,
            goal_id: None,
            currency: transaction_data.currency.as_deref().unwrap_or(currency),
            created_at: chrono::Utc::now().naive_utc(),
        };

        Ok(dsl::insert_into(transactions)
            .values(&new_transaction)
            .get_result::<Transaction>(
                &mut *(self.get_connection()?).borrow_mut(),
            )?)
    }

    /// Records the auto-save expense and moves the contribution onto the
    /// goal in a single database transaction. The goal increment happens at
    /// the SQL level so concurrent allocations cannot lose updates.
    pub fn apply_allocation(
        &mut self,
        plan: &AllocationPlan,
        income: &Transaction,
    ) -> Result<(Transaction, Goal), DaoError> {
        let description = format!("Auto-save for goal: {}", plan.goal_title);

        let savings_expense = NewTransaction {
            id: Uuid::new_v4(),
            user_email: &income.user_email,
            kind: TransactionKind::Expense,
            amount_cents: plan.contribution_cents,
            category: Category::Savings,
            tags: Vec::new(),
            transaction_date: chrono::Utc::now().date_naive(),
            description: Some(&description),
            is_recurring: false,
            recurring_frequency: None,
            auto_save: false,
            goal_id: Some(plan.goal_id),
            currency: &income.currency,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let db_connection = self.get_connection()?;
        let mut db_connection = db_connection.borrow_mut();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                let created_expense = dsl::insert_into(transactions)
                    .values(&savings_expense)
                    .get_result::<Transaction>(conn)?;

                let updated_goal = diesel::update(
                    goals
                        .find(plan.goal_id)
                        .filter(goal_fields::user_email.eq(&income.user_email)),
                )
                .set(
                    goal_fields::saved_amount_cents
                        .eq(goal_fields::saved_amount_cents + plan.contribution_cents),
                )
                .get_result::<Goal>(conn)?;

                Ok((created_expense, updated_goal))
            })
    }

    pub fn get_transactions(&mut self, scope: &UserScope) -> Result<Vec<Transaction>, DaoError> {
        let mut query = transactions.into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(transaction_fields::user_email.eq(email));
        }

        Ok(query
            .order(transaction_fields::created_at.desc())
            .load::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_transactions_by_tag(
        &mut self,
        scope: &UserScope,
        tag: &str,
    ) -> Result<Vec<Transaction>, DaoError> {
        let mut query = transactions
            .filter(transaction_fields::tags.contains(vec![tag.to_owned()]))
            .into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(transaction_fields::user_email.eq(email));
        }

        Ok(query
            .order(transaction_fields::created_at.desc())
            .load::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_transaction_by_id(
        &mut self,
        transaction_id: Uuid,
        scope: &UserScope,
    ) -> Result<Transaction, DaoError> {
        let mut query = transactions.find(transaction_id).into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(transaction_fields::user_email.eq(email));
        }

        Ok(query.first::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn update_transaction(
        &mut self,
        transaction_id: Uuid,
        user_email: &str,
        changes: &TransactionChanges,
    ) -> Result<Transaction, DaoError> {
        Ok(diesel::update(
            transactions
                .find(transaction_id)
                .filter(transaction_fields::user_email.eq(user_email)),
        )
        .set(changes)
        .get_result::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn delete_transaction(
        &mut self,
        transaction_id: Uuid,
        user_email: &str,
    ) -> Result<Transaction, DaoError> {
        Ok(diesel::delete(
            transactions
                .find(transaction_id)
                .filter(transaction_fields::user_email.eq(user_email)),
        )
        .get_result::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_recurring_transactions(
        &mut self,
        scope: &UserScope,
    ) -> Result<Vec<Transaction>, DaoError> {
        let mut query = transactions
            .filter(transaction_fields::is_recurring.eq(true))
            .into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(transaction_fields::user_email.eq(email));
        }

        Ok(query
            .order(transaction_fields::transaction_date.desc())
            .load::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_transactions_in_range(
        &mut self,
        scope: &UserScope,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Transaction>, DaoError> {
        let mut query = transactions
            .filter(transaction_fields::transaction_date.ge(start_date))
            .filter(transaction_fields::transaction_date.le(end_date))
            .into_boxed();

        if let UserScope::Owner(email) = scope {
            query = query.filter(transaction_fields::user_email.eq(email));
        }

        Ok(query
            .order((
                transaction_fields::transaction_date.asc(),
                transaction_fields::created_at.asc(),
            ))
            .load::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }

    pub fn get_expenses_in_range(
        &mut self,
        user_email: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Transaction>, DaoError> {
        Ok(transactions
            .filter(transaction_fields::user_email.eq(user_email))
            .filter(transaction_fields::kind.eq(TransactionKind::Expense))
            .filter(transaction_fields::transaction_date.ge(start_date))
            .filter(transaction_fields::transaction_date.le(end_date))
            .order((
                transaction_fields::transaction_date.asc(),
                transaction_fields::created_at.asc(),
            ))
            .load::<Transaction>(&mut *(self.get_connection()?).borrow_mut())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::budget::tests::generate_user_email;
    use crate::db::goal;
    use crate::request_io::{InputGoal, InputTransaction};
    use crate::test_env;

    fn income_input(amount_cents: i64) -> InputTransaction {
        InputTransaction {
            kind: TransactionKind::Income,
            amount_cents,
            category: Category::Salary,
            tags: Vec::new(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: None,
            is_recurring: false,
            recurring_frequency: None,
            auto_save: true,
            currency: None,
        }
    }

    #[test]
    #[ignore]
    fn test_apply_allocation_records_expense_and_increments_goal() {
        let db_thread_pool = &*test_env::DB_THREAD_POOL;
        let email = generate_user_email().unwrap();

        let goal = goal::Dao::new(db_thread_pool)
            .create_goal(
                &InputGoal {
                    title: String::from("Vacation"),
                    target_amount_cents: 100_000,
                    deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                    auto_save_percentage: 10,
                    priority_level: Some(1),
                    currency: Some(String::from("USD")),
                },
                &email,
            )
            .unwrap();
        assert_eq!(goal.saved_amount_cents, 0);

        let mut dao = Dao::new(db_thread_pool);
        let income = dao
            .create_transaction(&income_input(50_000), &email, "USD")
            .unwrap();

        let plan = AllocationPlan {
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            contribution_cents: 5_000,
        };

        let (expense, updated_goal) = dao.apply_allocation(&plan, &income).unwrap();

        assert_eq!(expense.kind, TransactionKind::Expense);
        assert_eq!(expense.amount_cents, 5_000);
        assert_eq!(expense.category, Category::Savings);
        assert_eq!(expense.goal_id, Some(goal.id));
        assert_eq!(expense.user_email, email);
        assert_eq!(updated_goal.saved_amount_cents, 5_000);

        // The increment is applied at the SQL level, so a second allocation
        // accumulates instead of overwriting.
        let (_, updated_goal) = dao.apply_allocation(&plan, &income).unwrap();
        assert_eq!(updated_goal.saved_amount_cents, 10_000);
    }

    #[test]
    #[ignore]
    fn test_apply_allocation_refuses_another_users_goal() {
        let db_thread_pool = &*test_env::DB_THREAD_POOL;
        let owner_email = generate_user_email().unwrap();
        let other_email = generate_user_email().unwrap();

        let goal = goal::Dao::new(db_thread_pool)
            .create_goal(
                &InputGoal {
                    title: String::from("Emergency fund"),
                    target_amount_cents: 100_000,
                    deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                    auto_save_percentage: 10,
                    priority_level: Some(1),
                    currency: Some(String::from("USD")),
                },
                &owner_email,
            )
            .unwrap();

        let mut dao = Dao::new(db_thread_pool);
        let income = dao
            .create_transaction(&income_input(50_000), &other_email, "USD")
            .unwrap();

        let plan = AllocationPlan {
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            contribution_cents: 5_000,
        };

        let result = dao.apply_allocation(&plan, &income);
        assert!(matches!(
            result,
            Err(DaoError::QueryFailure(diesel::result::Error::NotFound))
        ));

        // The rejected allocation must not leave the synthetic expense behind.
        let expenses = dao
            .get_expenses_in_range(
                &other_email,
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2100, 1, 1).unwrap(),
            )
            .unwrap();
        assert!(expenses.is_empty());
    }
}
