diesel::table! {
    budgets (id) {
        id -> Uuid,
        user_email -> Text,
        amount_cents -> Int8,
        category -> Nullable<Text>,
        month -> Text,
        currency -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    goals (id) {
        id -> Uuid,
        user_email -> Text,
        title -> Text,
        target_amount_cents -> Int8,
        saved_amount_cents -> Int8,
        deadline -> Date,
        auto_save_percentage -> Int2,
        priority_level -> Int4,
        currency -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    transactions (id) {
        id -> Uuid,
        user_email -> Text,
        kind -> Text,
        amount_cents -> Int8,
        category -> Text,
        tags -> Array<Text>,
        transaction_date -> Date,
        description -> Nullable<Text>,
        is_recurring -> Bool,
        recurring_frequency -> Nullable<Text>,
        auto_save -> Bool,
        goal_id -> Nullable<Uuid>,
        currency -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        password_hash -> Text,
        role -> Text,
        preferred_currency -> Text,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(budgets, goals, transactions, users,);
