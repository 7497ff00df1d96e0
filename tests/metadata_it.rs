#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use seaplane_client::{
	api::KeyValue,
	encoding::{Key, Value},
	error::HttpErrorKind,
};

#[tokio::test]
async fn set_sends_the_base64_value_as_the_body() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let set = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/v1/config/base64:Zm9vL2Jhcg")
				.header("authorization", "Bearer t1")
				.body("aGVsbG8");
			then.status(200).body("\"Ok\"");
		})
		.await;
	let acknowledged = client(&server)
		.metadata()
		.set(&Key::from("foo/bar"), &Value::from("hello"))
		.await
		.expect("Write should succeed.");

	assert!(acknowledged);

	set.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_and_delete_address_the_encoded_key() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/config/base64:Zm9vL2Jhcg");
			then.status(200).body("{\"key\":\"Zm9vL2Jhcg\",\"value\":\"aGVsbG8\"}");
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/config/base64:Zm9vL2Jhcg");
			then.status(200).body("\"Ok\"");
		})
		.await;
	let metadata = client(&server).metadata();
	let key = Key::from("foo/bar");
	let pair = metadata.get(&key).await.expect("Read should succeed.");

	assert_eq!(pair, KeyValue::new("foo/bar", "hello"));
	assert!(metadata.delete(&key).await.expect("Delete should succeed."));

	get.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn missing_keys_surface_not_found() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let _get = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/config/base64:bWlzc2luZw");
			then.status(404).body("\"Key not found\"");
		})
		.await;
	let err = client(&server)
		.metadata()
		.get(&Key::from("missing"))
		.await
		.expect_err("Key is absent.");

	match err {
		seaplane_client::Error::Http(err) => assert_eq!(err.kind(), HttpErrorKind::NotFound),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn directory_listings_resume_from_the_next_key() {
	let server = MockServer::start_async().await;
	let _identity = mock_identity(&server, "t1").await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/config/base64:ZGly/").query_param("from", "base64:ZGlyL2I");
			then.status(200)
				.body("{\"kvs\":[{\"key\":\"ZGlyL2I\",\"value\":\"Mg\"}],\"next_key\":null}");
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/config/base64:ZGly/").query_param_missing("from");
			then.status(200)
				.body("{\"kvs\":[{\"key\":\"ZGlyL2E\",\"value\":\"MQ\"}],\"next_key\":\"ZGlyL2I\"}");
		})
		.await;
	let metadata = client(&server).metadata();
	let directory = Key::from("dir");
	let page = metadata.get_page(Some(&directory), None).await.expect("First page should load.");

	assert_eq!(page.items, vec![KeyValue::new("dir/a", "1")]);
	assert_eq!(page.next, Some(Key::from("dir/b")));

	let all = metadata
		.get_all_pages(Some(&directory), None)
		.await
		.expect("Exhaustive listing should succeed.");

	assert_eq!(all, vec![KeyValue::new("dir/a", "1"), KeyValue::new("dir/b", "2")]);

	first.assert_calls_async(2).await;
	second.assert_calls_async(1).await;
}
