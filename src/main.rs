//! Content Core - demo driver
//!
//! Seeds the user directory, logs in the administrator, creates and
//! publishes sample content, then prints the overview report as a summary
//! and as CSV.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_core::{
    config::{Config, DEFAULT_CONFIG_FILE},
    controllers::{ContentController, ReportController, UserDirectory},
    models::{Category, Content, ExportFormat, Tag},
};

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_with_env(Path::new(DEFAULT_CONFIG_FILE))?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting content core demo...");

    let users = UserDirectory::from_config(&config.users);
    tracing::info!("User directory ready: {} users", users.all_users().len());

    let admin = users
        .login("admin", "admin123")
        .context("Default administrator is not available")?;

    let contents = Arc::new(ContentController::new());
    contents.set_current_actor(admin);
    let reports = ReportController::new(contents.clone());

    let news = Category::shared("News", Some("Daily coverage".to_string()));
    let local = Category::shared("Local", None);
    Category::add_subcategory(&news, local.clone());
    let featured = Arc::new(Tag::new("Featured"));

    let mut article = Content::article(
        "City council approves new park",
        "Ana Lopez",
        local.clone(),
        "The council voted on Tuesday to convert the old rail yard into a public park with trails.",
    );
    article.add_tag(featured.clone());
    let article_id = contents.create(article)?;

    let video_id = contents.create(Content::video(
        "Council session highlights",
        "Ben Ortiz",
        news.clone(),
        "https://media.example.com/council.mp4",
        754,
        "1080p",
    ))?;

    contents.create(Content::image(
        "Rail yard at dawn",
        "Ana Lopez",
        local.clone(),
        "https://media.example.com/railyard.png",
        "1920x1080",
        "png",
    ))?;

    contents.publish_content(article_id)?;
    contents.publish_content(video_id)?;

    for content in reports.get_most_recent_content(config.reports.recent_limit) {
        println!("{}\n", content.display());
    }

    let report = reports.generate_content_report();
    println!("{}", reports.export_report(report.id, ExportFormat::Summary));
    print!("{}", reports.export_report(report.id, ExportFormat::Csv));

    tracing::info!(
        news = news.tree().total_content_count(),
        featured = featured.usage_count(),
        "Demo finished"
    );
    Ok(())
}
