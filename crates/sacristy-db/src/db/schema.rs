// Table definitions are maintained by hand; keep them in sync with the SQL
// under migrations/.

diesel::table! {
    app_user (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        role -> Text,
        password_hash -> Text,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    room (id) {
        id -> Uuid,
        name -> Text,
        capacity -> Nullable<Int4>,
        color -> Nullable<Text>,
        notes -> Nullable<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    booking (id) {
        id -> Uuid,
        description -> Text,
        room_id -> Nullable<Uuid>,
        booking_date -> Nullable<Text>,
        start_time -> Nullable<Text>,
        end_time -> Nullable<Text>,
        repeat -> Text,
        repeat_day -> Nullable<Text>,
        user_id -> Uuid,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    member (id) {
        id -> Uuid,
        name -> Text,
        email -> Nullable<Text>,
        phone -> Nullable<Text>,
        birth_date -> Nullable<Text>,
        address -> Nullable<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    scale (id) {
        id -> Uuid,
        description -> Text,
        scale_date -> Nullable<Text>,
        start_time -> Nullable<Text>,
        room_id -> Nullable<Uuid>,
        notes -> Nullable<Text>,
        user_id -> Uuid,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    scale_assignment (id) {
        id -> Uuid,
        scale_id -> Uuid,
        member_id -> Uuid,
        duty -> Text,
    }
}

diesel::joinable!(booking -> room (room_id));
diesel::joinable!(booking -> app_user (user_id));
diesel::joinable!(scale -> room (room_id));
diesel::joinable!(scale -> app_user (user_id));
diesel::joinable!(scale_assignment -> scale (scale_id));
diesel::joinable!(scale_assignment -> member (member_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_user,
    room,
    booking,
    member,
    scale,
    scale_assignment,
);
