use chrono::NaiveDate;

pub struct GoalDeadlineReminder {}

impl GoalDeadlineReminder {
    pub fn generate(
        goal_title: &str,
        deadline: NaiveDate,
        saved_amount_cents: i64,
        target_amount_cents: i64,
    ) -> String {
        let remaining_cents = target_amount_cents - saved_amount_cents;

        format!(
            "<html>
               <head>
                 <style>
                   body {{
                     font-family: Arial, sans-serif;
                     text-align: center;
                   }}
                 </style>
               </head>
             <body>
               <h1>Savings goal deadline approaching</h1>
               <p>Your goal <b>{}</b> is due on <b>{}</b>.</p>
               <p>You still need <b>{}</b> (in cents) to reach your target.</p>
             </body>
             </html>",
            goal_title,
            deadline.format("%Y-%m-%d"),
            remaining_cents,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_deadline_reminder_includes_remaining_amount() {
        let body = GoalDeadlineReminder::generate(
            "Emergency fund",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            40_000,
            100_000,
        );

        assert!(body.contains("Emergency fund"));
        assert!(body.contains("2026-03-01"));
        assert!(body.contains("60000"));
    }
}
