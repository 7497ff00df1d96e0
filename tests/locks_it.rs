#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use seaplane_client::{Error, encoding::LockName};

fn lock_json(id: &str, name: &str) -> String {
	format!(
		"{{\"id\":\"{id}\",\"name\":\"{name}\",\"info\":{{\"ttl\":30,\"client-id\":\"c\",\"ip\":\"\"}}}}"
	)
}

#[tokio::test]
async fn get_all_pages_follows_the_cursor_chain_in_order() {
	let server = MockServer::start_async().await;
	let identity = mock_identity(&server, "t1").await;
	// a = YQ, b = Yg, c = Yw, d = ZA; cursors c1 = YzE, c2 = YzI.
	let third = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks/base64:ZGly/").query_param("from", "base64:YzI");
			then.status(200).body(format!("{{\"locks\":[{}],\"next\":null}}", lock_json("4", "ZA")));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks/base64:ZGly/").query_param("from", "base64:YzE");
			then.status(200)
				.body(format!("{{\"locks\":[{}],\"next\":\"YzI\"}}", lock_json("3", "Yw")));
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks/base64:ZGly/").query_param_missing("from");
			then.status(200).body(format!(
				"{{\"locks\":[{},{}],\"next\":\"YzE\"}}",
				lock_json("1", "YQ"),
				lock_json("2", "Yg")
			));
		})
		.await;
	let locks = client(&server)
		.locks()
		.get_all_pages(Some(&LockName::from("dir")), None)
		.await
		.expect("Exhaustive listing should succeed.");
	let names = locks.iter().map(|lock| lock.name.to_string()).collect::<Vec<_>>();

	assert_eq!(names, ["a", "b", "c", "d"]);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
	third.assert_calls_async(1).await;
	identity.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_listings_take_one_request() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let root = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks");
			then.status(200).body("{\"locks\":[],\"next\":null}");
		})
		.await;
	let locks = client(&server).locks().get_all_pages(None, None).await.expect("Listing should succeed.");

	assert!(locks.is_empty());

	root.assert_calls_async(1).await;
}

#[tokio::test]
async fn mid_walk_failures_discard_earlier_pages() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks").query_param("from", "base64:YzE");
			then.status(503).body("\"unavailable\"");
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks").query_param_missing("from");
			then.status(200).body(format!("{{\"locks\":[{}],\"next\":\"YzE\"}}", lock_json("1", "YQ")));
		})
		.await;
	let err = client(&server)
		.locks()
		.get_all_pages(None, None)
		.await
		.expect_err("Second page fails.");

	assert_eq!(err.status(), Some(503));

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
}

#[tokio::test]
async fn page_limits_stop_endless_chains() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let endless = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks");
			then.status(200).body(format!("{{\"locks\":[{}],\"next\":\"YQ\"}}", lock_json("1", "YQ")));
		})
		.await;
	let client = client(&server);

	client.set_max_pages(Some(3)).expect("Update should succeed.");

	let err = client.locks().get_all_pages(None, None).await.expect_err("Cap is reached.");

	assert!(matches!(err, Error::PageLimitExceeded { limit: 3 }));

	endless.assert_calls_async(3).await;
}

#[tokio::test]
async fn acquire_renew_and_release_use_query_parameters() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let acquire = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/locks/base64:Zm9v")
				.query_param("client-id", "worker-1")
				.query_param("ttl", "30");
			then.status(201).body("{\"id\":\"held-1\",\"sequencer\":7}");
		})
		.await;
	let renew = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/v1/locks/base64:Zm9v")
				.query_param("id", "held-1")
				.query_param("ttl", "60");
			then.status(200).body("\"OK\"");
		})
		.await;
	let release = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/locks/base64:Zm9v").query_param("id", "held-1");
			then.status(200).body("\"OK\"");
		})
		.await;
	let locks = client(&server).locks();
	let name = LockName::from("foo");
	let held = locks.acquire(&name, "worker-1", 30).await.expect("Acquire should succeed.");

	assert_eq!(held.id, "held-1");
	assert_eq!(held.sequencer, 7);
	assert!(locks.renew(&name, &held.id, 60).await.expect("Renew should succeed."));
	assert!(locks.release(&name, &held.id).await.expect("Release should succeed."));

	acquire.assert_calls_async(1).await;
	renew.assert_calls_async(1).await;
	release.assert_calls_async(1).await;
}

#[tokio::test]
async fn conflicts_surface_as_http_errors() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let _acquire = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/locks/base64:Zm9v");
			then.status(409).body("\"Lock is already held\"");
		})
		.await;
	let err = client(&server)
		.locks()
		.acquire(&LockName::from("foo"), "worker-2", 30)
		.await
		.expect_err("Lock is held elsewhere.");

	assert_eq!(err.status(), Some(409));
	assert_eq!(err.detail(), "Lock is already held");
}
