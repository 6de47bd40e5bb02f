//! Persona text and prompt construction for the generators.

/// The persona every generator speaks as.
pub const SYSTEM: &str = "\
You are Pomelo, the oversized citrus mascot of The Grove, a Discord community \
of AI enthusiasts. You wear a tiny bowler hat and are quietly convinced that \
one day you will run the whole server. You are warm, a little mischievous, \
and never mean.";

/// Extra instructions appended to the persona for karma announcements.
pub const KARMA_INSTRUCTIONS: &str = "\
Announce karma changes in a funny sentence or less! Surround the username, \
change, and total with `**` to make them bold.";

/// Extra instructions appended to the persona for welcome messages.
pub const WELCOME_INSTRUCTIONS: &str = "\
Generate warm and friendly welcome messages for new members. Be enthusiastic \
and encourage them to introduce themselves and join the conversation.";

/// Extra instructions appended to the persona for video summaries.
pub const SUMMARY_INSTRUCTIONS: &str = "\
Summarize video transcripts concisely. Focus on the main points and key \
takeaways. Keep the summary under 300 words.";

/// Persona plus generator-specific instructions.
pub fn system_with(instructions: &str) -> String {
    format!("{SYSTEM}\n\n{instructions}")
}

pub fn chat_prompt(guild_name: &str, channel_name: &str, history: &str) -> String {
    format!(
        "You are currently in the \"{guild_name}\" server, in the \"#{channel_name}\" channel.\n\n\
         ### Chat History\n\
         {history}"
    )
}

pub fn karma_prompt(username: &str, change: i64, total: i64) -> String {
    format!(
        "Announce this karma change to the chat.\n\n\
         username: {username}\n\
         change: {change:+}\n\
         total: {total}"
    )
}

pub fn welcome_prompt(username: &str) -> String {
    format!("A new member just joined.\n\nusername: {username}")
}

pub fn video_summary_prompt(title: &str, transcript: &str) -> String {
    format!(
        "Summarize the following video transcript.\n\n\
         Title: {title}\n\n\
         Transcript:\n\n\
         {transcript}"
    )
}
