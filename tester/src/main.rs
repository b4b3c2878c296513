use std::{env, time::Duration};

use anyhow::{Context, Result, bail};
use pitchboard::store::PitchRecord;
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> Result<()> {
    let base = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3100".to_string());
    let client = reqwest::Client::new();

    let session: Value = client
        .post(format!("{base}/api/session"))
        .json(&json!({
            "id": "ada",
            "name": "Ada",
            "avatar": "https://example.com/ada.png",
            "bio": "Builds rockets"
        }))
        .send()
        .await?
        .json()
        .await?;

    let token = session["token"].as_str().context("no session token")?;
    println!("Signed in as {}", session["identity"]);

    let submitted: Value = client
        .post(format!("{base}/api/pitches"))
        .bearer_auth(token)
        .json(&json!({
            "title": "Acme",
            "description": "A reusable rocket for regional deliveries",
            "category": "Tech",
            "link": "https://x.com",
            "pitch": "Rockets, but affordable"
        }))
        .send()
        .await?
        .json()
        .await?;

    println!("Submit: {submitted}");

    if submitted["status"] != "SUCCESS" {
        bail!("expected SUCCESS, got {}", submitted["status"]);
    }
    let id = submitted["id"].as_str().context("no pitch id")?.to_string();

    let rejected: Value = client
        .post(format!("{base}/api/pitches"))
        .bearer_auth(token)
        .json(&json!({
            "title": "Acme",
            "description": "A reusable rocket for regional deliveries",
            "category": "Tech",
            "link": "not-a-url",
            "pitch": "Rockets, but affordable"
        }))
        .send()
        .await?
        .json()
        .await?;

    if rejected["status"] != "ERROR" || rejected["fieldErrors"]["link"].is_null() {
        bail!("expected a link field error, got {rejected}");
    }
    println!("Invalid link rejected: {}", rejected["fieldErrors"]["link"]);

    let first: PitchRecord = client
        .get(format!("{base}/api/pitches/{id}"))
        .send()
        .await?
        .json()
        .await?;
    println!("First view renders {} views", first.views);

    // Give the deferred worker a moment to land the increment.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let second: PitchRecord = client
        .get(format!("{base}/api/pitches/{id}"))
        .send()
        .await?
        .json()
        .await?;
    println!("Second view renders {} views", second.views);

    if second.views != first.views + 1 {
        bail!("expected {} views, got {}", first.views + 1, second.views);
    }

    let profile: Value = client
        .get(format!("{base}/api/users/ada"))
        .bearer_auth(token)
        .send()
        .await?
        .json()
        .await?;

    println!(
        "Profile: {} pitches, yours={}",
        profile["pitches"].as_array().map_or(0, Vec::len),
        profile["yours"]
    );

    Ok(())
}
