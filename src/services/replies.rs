//! 对话模块接管之前机器人发送的固定回复。

/// 介绍机器人的命令
pub const GREETING_COMMAND: &str = "/start";

pub const GREETING: &str = "Hello everyone! I am an AI under development, with learning and conversational abilities. To start interacting with me, type the magic word. 😉 What is the magic word?";

pub const REGISTERED: &str = "You managed to say the magic word and now we can finally start interacting. 🤖 If you're curious to see what commands I can execute, visit t.me/giul_ia_actions_bot, while if you want to take a look at my thought process, I'm waiting for you at t.me/giul_ia_think_bot. To interact with me, just write in this chat! 😉 Up until now, you've been shown prerendered text, now the magic happens.";

pub const WELCOME_BACK: &str = "Welcome Back to Giulia BOT";

pub const SAY_MAGIC_WORD: &str = "i'm curious to get to know you, but to interact with you, you'll need to say the magic word! 😉 What are you waiting for? 😄";

/// GET 请求返回的正文
pub const IDENTIFICATION: &str = "Silicia - Giul-IA BOT - telegram gateway";
