// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Manual verification script for the PubSub WebSocket client.
//!
//! Connects to the production edge, listens to the topics given on the command
//! line, and prints every delivered payload until interrupted.
//!
//! Usage:
//! ```bash
//! TWITCH_AUTH_TOKEN=your_oauth_token \
//!   cargo run --bin pubsub-listen -p twitch-pubsub -- channel-points.44322889
//! ```

use twitch_pubsub::{PubSubClient, PubSubConfig, PubSubEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let topics: Vec<String> = std::env::args().skip(1).collect();
    let auth_token = std::env::var("TWITCH_AUTH_TOKEN").ok();
    if auth_token.is_none() {
        tracing::warn!("TWITCH_AUTH_TOKEN not set, most topics will reject the subscription");
    }

    let client = PubSubClient::new(PubSubConfig::new(auth_token));
    let mut events = client.events().await?;

    client.connect().await?;
    tracing::info!("Connected to {}", client.url());

    if !topics.is_empty() {
        client.listen(topics).await?;
        tracing::info!("Listening to {:?}", client.topics().await?);
    }

    while let Some(event) = events.recv().await {
        match event {
            PubSubEvent::Message(msg) => println!("{}: {}", msg.topic, msg.message),
            PubSubEvent::Error(e) => tracing::warn!("{e}"),
            other => tracing::info!("{other:?}"),
        }
    }

    Ok(())
}
