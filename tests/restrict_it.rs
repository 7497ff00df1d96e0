#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use seaplane_client::{
	Error,
	api::{Api, Provider, Region, RestrictionCursor, RestrictionDetails, RestrictionState},
	encoding::Key,
	error::ValidationError,
};

fn restriction_json(api: &str, directory: &str) -> serde_json::Value {
	json!({
		"api": api,
		"directory": directory,
		"details": {
			"regions_allowed": ["XE"],
			"regions_denied": [],
			"providers_allowed": [],
			"providers_denied": ["AWS"]
		},
		"state": "Enforced"
	})
}

#[tokio::test]
async fn set_and_get_address_the_api_directory() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let set = server
		.mock_async(|when, then| {
			when.method(PUT).path("/v1/restrict/Config/base64:Zm9v/").json_body(json!({
				"regions_allowed": ["XE"],
				"regions_denied": [],
				"providers_allowed": [],
				"providers_denied": ["AWS"]
			}));
			then.status(200).body("\"Ok\"");
		})
		.await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/restrict/Config/base64:Zm9v/");
			then.status(200).json_body(restriction_json("Config", "Zm9v"));
		})
		.await;
	let restrict = client(&server).restrict();
	let directory = Key::from("foo");
	let details = RestrictionDetails::builder()
		.allow_region(Region::Europe)
		.deny_provider(Provider::Aws)
		.build()
		.expect("Details should build.");

	assert!(restrict.set(Api::Config, &directory, &details).await.expect("Set should succeed."));

	let restriction = restrict.get(Api::Config, &directory).await.expect("Get should succeed.");

	assert_eq!(restriction.api, Api::Config);
	assert_eq!(restriction.directory, directory);
	assert_eq!(restriction.details, details);
	assert_eq!(restriction.state, RestrictionState::Enforced);

	set.assert_calls_async(1).await;
	get.assert_calls_async(1).await;
}

#[tokio::test]
async fn resuming_without_an_api_fails_before_any_request() {
	let server = MockServer::start_async().await;
	let identity = mock_identity(&server, "t1").await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/restrict");
			then.status(200).body("{\"restrictions\":[],\"next_api\":null,\"next_key\":null}");
		})
		.await;
	let restrict = client(&server).restrict();
	let from = Key::from("foo");
	let err = restrict.get_page(None, Some(&from), false).await.expect_err("Api is required.");

	assert!(matches!(err, Error::Validation(ValidationError::MissingRestrictionApi)));

	let err = restrict.get_all_pages(None, Some(&from)).await.expect_err("Api is required.");

	assert!(matches!(err, Error::Validation(ValidationError::MissingRestrictionApi)));

	listing.assert_calls_async(0).await;
	identity.assert_calls_async(0).await;
}

#[tokio::test]
async fn get_page_filters_by_api_unless_all_range() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let filtered = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/restrict/Locks")
				.query_param("from", "base64:Zm9v")
				.query_param("from_api", "Locks");
			then.status(200).json_body(json!({
				"restrictions": [restriction_json("Locks", "Zm9v")],
				"next_api": "Locks",
				"next_key": "YmFy"
			}));
		})
		.await;
	let page = client(&server)
		.restrict()
		.get_page(Some(Api::Locks), Some(&Key::from("foo")), false)
		.await
		.expect("Page should load.");

	assert_eq!(page.items.len(), 1);
	assert_eq!(page.next, Some(RestrictionCursor { api: Api::Locks, key: Key::from("bar") }));

	filtered.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_all_pages_resumes_with_the_composite_cursor() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/restrict")
				.query_param("from", "base64:YmFy")
				.query_param("from_api", "Locks");
			then.status(200).json_body(json!({
				"restrictions": [restriction_json("Locks", "YmFy")],
				"next_api": "locks",
				"next_key": null
			}));
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/restrict").query_param_missing("from");
			then.status(200).json_body(json!({
				"restrictions": [restriction_json("Config", "Zm9v")],
				"next_api": "Locks",
				"next_key": "YmFy"
			}));
		})
		.await;
	let restrictions = client(&server)
		.restrict()
		.get_all_pages(Some(Api::Config), None)
		.await
		.expect("Exhaustive listing should succeed.");
	let directories =
		restrictions.iter().map(|restriction| restriction.directory.to_string()).collect::<Vec<_>>();

	assert_eq!(directories, ["foo", "bar"]);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}
