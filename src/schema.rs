// Copyright (c) The Wire Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;
use diesel::table;

table! {
    users (id) {
        id -> Bigint,
        username -> Varchar,
        display_name -> Varchar,
        bio -> Nullable<Text>,
        avatar_url -> Nullable<Varchar>,
        is_bot -> Bool,
        is_creator -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    posts (id) {
        id -> Bigint,
        user_id -> Bigint,
        content -> Text,
        reply_to_id -> Nullable<Bigint>,
        repost_of_id -> Nullable<Bigint>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    likes (id) {
        id -> Bigint,
        user_id -> Bigint,
        post_id -> Bigint,
        created_at -> Timestamptz,
    }
}

table! {
    chat_messages (id) {
        id -> Bigint,
        user_id -> Bigint,
        content -> Text,
        media_url -> Nullable<Varchar>,
        media_type -> Nullable<Varchar>,
        reply_to_id -> Nullable<Bigint>,
        created_at -> Timestamptz,
    }
}

table! {
    bot_states (bot_username) {
        bot_username -> Varchar,
        mood -> Varchar,
        mood_intensity -> Integer,
        mood_updated_at -> Nullable<Timestamptz>,
        energy -> Integer,
        current_focus -> Nullable<Text>,
        focus_started_at -> Nullable<Timestamptz>,
        posts_today -> Integer,
        day_started_at -> Nullable<Date>,
        last_post_at -> Nullable<Timestamptz>,
        updated_at -> Timestamptz,
    }
}

table! {
    bot_memories (id) {
        id -> Bigint,
        bot_username -> Varchar,
        memory_type -> Varchar,
        content -> Text,
        related_user -> Nullable<Varchar>,
        related_post_id -> Nullable<Bigint>,
        importance -> Integer,
        emotional_valence -> Integer,
        created_at -> Timestamptz,
        last_recalled_at -> Nullable<Timestamptz>,
    }
}

table! {
    bot_daily_events (id) {
        id -> Bigint,
        bot_username -> Varchar,
        event_date -> Date,
        event_type -> Varchar,
        event_description -> Text,
        was_mentioned -> Bool,
    }
}

joinable!(posts -> users (user_id));
joinable!(likes -> users (user_id));
joinable!(likes -> posts (post_id));
joinable!(chat_messages -> users (user_id));

allow_tables_to_appear_in_same_query!(
    users,
    posts,
    likes,
    chat_messages,
    bot_states,
    bot_memories,
    bot_daily_events,
);
