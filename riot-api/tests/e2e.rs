use std::time::Duration;

use herald_riot_api::client::{HttpRiotClient, RiotApi, RiotClientConfig};
use herald_riot_api::ratelimit::{RateLimiter, RateLimiterConfig};
use herald_riot_api::region::RegionRouter;
use herald_riot_api::{Cache, InMemoryCache};
use herald_types::Region;
use httpmock::prelude::*;
use serde_json::json;
use tokio::time::Instant;

fn client_against(server: &MockServer) -> HttpRiotClient<InMemoryCache> {
    let router = RegionRouter::new(Region::Na1).with_override(Region::Na1, server.base_url());
    let limiter = RateLimiter::new(RateLimiterConfig::default());
    HttpRiotClient::new(
        router,
        limiter,
        InMemoryCache::new(),
        "TEST_KEY".to_string(),
        RiotClientConfig::default(),
    )
}

#[tokio::test]
async fn get_summoner_by_puuid_decodes_expected_shape() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/lol/summoner/v4/summoners/by-puuid/abc")
            .header("X-Riot-Token", "TEST_KEY");
        then.status(200).json_body(json!({
            "id": "sid",
            "puuid": "abc",
            "name": "Foo",
            "summonerLevel": 200,
            "profileIconId": 4,
            "unknownField": "ignored",
        }));
    });

    let client = client_against(&server);
    let summoner = client
        .get_summoner_by_puuid(Region::Na1, "abc", Instant::now() + Duration::from_secs(5))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(summoner.puuid, "abc");
    assert_eq!(summoner.level, 200);
}

#[tokio::test]
async fn not_found_surfaces_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/lol/summoner/v4/summoners/by-puuid/missing");
        then.status(404);
    });

    let client = client_against(&server);
    let result = client
        .get_summoner_by_puuid(Region::Na1, "missing", Instant::now() + Duration::from_secs(5))
        .await;

    mock.assert_hits(1);
    assert!(matches!(
        result,
        Err(herald_riot_api::RiotClientError::NotFound)
    ));
}

#[tokio::test]
async fn second_call_within_ttl_is_served_from_cache() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/lol/summoner/v4/summoners/by-puuid/abc");
        then.status(200).json_body(json!({
            "id": "sid",
            "puuid": "abc",
            "name": "Foo",
            "summonerLevel": 30,
            "profileIconId": 1,
        }));
    });

    let client = client_against(&server);
    let deadline = Instant::now() + Duration::from_secs(5);
    client.get_summoner_by_puuid(Region::Na1, "abc", deadline).await.unwrap();
    client.get_summoner_by_puuid(Region::Na1, "abc", deadline).await.unwrap();

    mock.assert_hits(1);
}

#[tokio::test]
async fn transient_server_error_is_retried_then_succeeds() {
    let server = MockServer::start_async().await;
    let failing = server.mock(|when, then| {
        when.method(GET)
            .path("/lol/summoner/v4/summoners/by-puuid/flaky");
        then.status(503);
    });

    let client = client_against(&server);
    let result = client
        .get_summoner_by_puuid(Region::Na1, "flaky", Instant::now() + Duration::from_secs(5))
        .await;

    // All retries hit the same failing mock; after exhausting retries the
    // client surfaces a fatal Upstream error rather than hanging forever.
    assert!(result.is_err());
    assert!(failing.hits() >= 1);
}
