// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social client command line.
//!
//! Each invocation restores the persisted session, performs one action
//! through the controller and prints the resulting view.

use anyhow::Context;
use clap::{Parser, Subcommand};
use social_client::{
    config::Config,
    models::{NewPost, PostId, PostMedia, RegistrationForm, Upload, UserId, UserSummary},
    session::FileStore,
    time_utils::format_relative,
    view::{Page, ViewState},
    Action, Controller, Outcome,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Posts from people you follow
    Feed,
    /// Recent posts from everyone
    Explore,
    /// A user's profile and posts
    Profile { user_id: String },
    /// Like or unlike a post
    Like {
        post_id: String,
        /// Look the post up in the explore feed
        #[arg(long)]
        explore: bool,
    },
    /// Show a post's comments
    Comments {
        post_id: String,
        #[arg(long)]
        explore: bool,
    },
    /// Comment on a post
    Comment {
        post_id: String,
        text: String,
        #[arg(long)]
        explore: bool,
    },
    /// Create a post
    Post {
        #[arg(short, long, default_value = "")]
        content: String,
        #[arg(long)]
        media_url: Option<String>,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete one of your posts
    DeletePost { post_id: String },
    /// Search users by name
    Search { username: String },
    /// Follow or unfollow a user
    Follow { user_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let store = FileStore::new(config.session_file.clone());
    let controller = Controller::new(&config, store);

    let ok = run(&controller, cli.command).await?;

    if let Some(message) = controller.banner().current() {
        println!("{}", message.text);
    }
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(controller: &Controller<FileStore>, command: Command) -> anyhow::Result<bool> {
    let outcome = match command {
        Command::Login { email, password } => {
            controller
                .dispatch(Action::Login { email, password })
                .await
        }
        Command::Register {
            email,
            username,
            password,
            dob,
        } => {
            controller
                .dispatch(Action::Register(RegistrationForm {
                    email,
                    username,
                    password,
                    date_of_birth: dob,
                }))
                .await
        }
        Command::Logout => controller.dispatch(Action::Logout).await,
        Command::Whoami => {
            match controller.session().current_user() {
                Some(user) => print_users(std::slice::from_ref(user)),
                None => println!("Not logged in"),
            }
            return Ok(true);
        }
        Command::Feed => controller.dispatch(Action::Navigate(Page::Feed)).await,
        Command::Explore => controller.dispatch(Action::Navigate(Page::Explore)).await,
        Command::Profile { user_id } => {
            controller
                .dispatch(Action::Navigate(Page::Profile(UserId::from(user_id.as_str()))))
                .await
        }
        Command::Like { post_id, explore } => {
            open_page(controller, explore).await;
            controller
                .dispatch(Action::TogglePostLike(PostId::from(post_id.as_str())))
                .await
        }
        Command::Comments { post_id, explore } => {
            open_page(controller, explore).await;
            controller
                .dispatch(Action::ToggleComments(PostId::from(post_id.as_str())))
                .await
        }
        Command::Comment {
            post_id,
            text,
            explore,
        } => {
            open_page(controller, explore).await;
            let post_id = PostId::from(post_id.as_str());
            controller
                .dispatch(Action::ToggleComments(post_id.clone()))
                .await;
            controller
                .dispatch(Action::PostComment {
                    post_id,
                    content: text,
                })
                .await
        }
        Command::Post {
            content,
            media_url,
            image,
        } => {
            let media = match (image, media_url) {
                (Some(path), _) => Some(PostMedia::File(read_upload(&path)?)),
                (None, Some(url)) => Some(PostMedia::Url(url)),
                (None, None) => None,
            };
            controller
                .dispatch(Action::CreatePost(NewPost { content, media }))
                .await
        }
        Command::DeletePost { post_id } => {
            controller
                .dispatch(Action::DeletePost(PostId::from(post_id.as_str())))
                .await
        }
        Command::Search { username } => controller.dispatch(Action::SearchUsers(username)).await,
        Command::Follow { user_id } => {
            let user_id = UserId::from(user_id.as_str());
            controller
                .dispatch(Action::Navigate(Page::Profile(user_id.clone())))
                .await;
            controller.dispatch(Action::ToggleFollow(user_id)).await
        }
    };

    match &outcome {
        Some(Outcome::Users(users)) => print_users(users),
        Some(_) => print_view(&controller.view()),
        None => {}
    }
    Ok(outcome.is_some())
}

async fn open_page(controller: &Controller<FileStore>, explore: bool) {
    let page = if explore { Page::Explore } else { Page::Feed };
    controller.dispatch(Action::Navigate(page)).await;
}

fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let mime_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(Upload {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string()),
        mime_type: mime_type.to_string(),
        bytes,
    })
}

fn print_view(view: &ViewState) {
    if let Some(profile) = &view.viewed_profile {
        println!(
            "{}  posts: {}  followers: {}  following: {}{}",
            profile.display_name(),
            profile.posts_count,
            profile.followers_count,
            profile.following_count,
            match profile.is_following {
                Some(true) => "  (following)",
                _ => "",
            }
        );
        println!("{}", profile.avatar());
        if let Some(bio) = &profile.bio {
            println!("{}", bio);
        }
        println!();
    }

    let now = chrono::Utc::now();
    for post in &view.posts {
        println!(
            "[{}] {} · {}",
            post.post_id,
            post.author_name(),
            format_relative(&post.created_at, now)
        );
        if !post.content.is_empty() {
            println!("  {}", post.content);
        }
        if let Some(media) = &post.media_url {
            println!("  {}", media);
        }
        println!(
            "  {} {} likes · {} comments",
            if post.is_liked_by_viewer { "♥" } else { "♡" },
            post.likes_count,
            post.comments_count
        );
        for comment in view.comments.get(&post.post_id).into_iter().flatten() {
            println!(
                "    [{}] {}: {} ({})",
                comment.comment_id,
                comment.username,
                comment.content,
                comment.likes_label()
            );
        }
    }
}

fn print_users(users: &[UserSummary]) {
    if users.is_empty() {
        println!("No users found");
    }
    for user in users {
        println!(
            "[{}] {}  followers: {}  following: {}",
            user.user_id,
            user.display_name(),
            user.followers_count,
            user.following_count
        );
    }
}

/// Initialize structured JSON logging to stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,social_client=info")),
        )
        .with(format)
        .init();
}
