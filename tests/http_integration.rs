//! Integration tests for the GCP-backed services using wiremock
//!
//! These tests point a real `GcpClient` at mocked endpoints to verify URL
//! construction, pagination, status classification and the end-to-end
//! collection path.

use gcp_inventory::gcp::auth::GcpCredentials;
use gcp_inventory::gcp::client::{ApiEndpoints, GcpClient};
use gcp_inventory::gcp::projects::{Project, ProjectDirectory, ResourceManagerDirectory};
use gcp_inventory::inventory::{Collector, ResourceKind, ScopeSet};
use gcp_inventory::resource::{fetch_all, ListRequest, ListingService};
use gcp_inventory::ApiError;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GcpClient {
    GcpClient::with_endpoints(
        GcpCredentials::from_static_token("test-token"),
        ApiEndpoints::rooted_at(&server.uri()),
    )
    .expect("client should build")
}

mod listing_tests {
    use super::*;

    /// Pages are followed until nextPageToken disappears
    #[tokio::test]
    async fn test_pagination_with_next_page_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/global/routes"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"name": "route-1"}, {"name": "route-2"}],
                "nextPageToken": "token-page-2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/global/routes"))
            .and(query_param("pageToken", "token-page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"name": "route-3"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ListRequest::Routes {
            project: "test-project".into(),
        };
        let items = fetch_all(&client, &request).await.expect("listing should succeed");

        let names: Vec<_> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["route-1", "route-2", "route-3"]);
    }

    /// An empty listing has no `items` key at all
    #[tokio::test]
    async fn test_empty_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/zones/us-central1-a/instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "compute#instanceList",
                "id": "projects/test-project/zones/us-central1-a/instances"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ListRequest::Instances {
            project: "test-project".into(),
            zone: "us-central1-a".into(),
        };
        let page = client.list_page(&request, None).await.expect("empty page is fine");
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    /// Aggregated address listings are flattened across regions
    #[tokio::test]
    async fn test_aggregated_addresses_flattened() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/aggregated/addresses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": {
                    "regions/us-central1": {"addresses": [{"name": "a"}]},
                    "regions/asia-east1": {"warning": {"code": "NO_RESULTS_ON_PAGE"}},
                    "regions/europe-west1": {"addresses": [{"name": "b"}, {"name": "c"}]}
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ListRequest::AggregatedAddresses {
            project: "test-project".into(),
        };
        let items = fetch_all(&client, &request).await.unwrap();
        assert_eq!(items.len(), 3);
    }

    /// Buckets are listed with the project as a query parameter
    #[tokio::test]
    async fn test_bucket_listing_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b"))
            .and(query_param("project", "test-project"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"name": "bucket-1", "location": "US", "storageClass": "STANDARD"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ListRequest::Buckets {
            project: "test-project".into(),
        };
        assert_eq!(fetch_all(&client, &request).await.unwrap().len(), 1);
    }
}

mod error_tests {
    use super::*;

    async fn status_error(status: u16, message: &str) -> ApiError {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/global/firewalls"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"code": status, "message": message}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ListRequest::Firewalls {
            project: "test-project".into(),
        };
        fetch_all(&client, &request).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_403_is_permission_denied() {
        let err = status_error(403, "Compute Engine API has not been used").await;
        assert_eq!(
            err,
            ApiError::PermissionDenied {
                status: 403,
                message: "Compute Engine API has not been used".into()
            }
        );
    }

    #[tokio::test]
    async fn test_404_is_not_found() {
        let err = status_error(404, "The resource was not found").await;
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_429_and_5xx_are_transient() {
        assert!(matches!(status_error(429, "Rate limit exceeded").await, ApiError::Transient(_)));
        assert!(matches!(status_error(503, "Backend error").await, ApiError::Transient(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/global/networks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = ListRequest::Networks {
            project: "test-project".into(),
        };
        let err = client.list_page(&request, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}

mod directory_tests {
    use super::*;

    /// Only ACTIVE projects are returned, across pages
    #[tokio::test]
    async fn test_list_projects_paginates_and_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects"))
            .and(query_param("filter", "parent.id:99"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [
                    {"projectId": "alpha-1", "name": "Alpha", "lifecycleState": "ACTIVE"},
                    {"projectId": "dead-1", "name": "Dead", "lifecycleState": "DELETE_REQUESTED"}
                ],
                "nextPageToken": "p2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/projects"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [
                    {"projectId": "beta-2", "name": "Beta", "lifecycleState": "ACTIVE"}
                ]
            })))
            .mount(&server)
            .await;

        let directory = ResourceManagerDirectory::new(client_for(&server), Some("99".into()));
        let projects = directory.list_projects().await.unwrap();

        assert_eq!(
            projects,
            vec![Project::new("alpha-1", "Alpha"), Project::new("beta-2", "Beta")]
        );
    }

    #[tokio::test]
    async fn test_directory_failure_surfaces() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/projects"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let directory = ResourceManagerDirectory::new(client_for(&server), None);
        assert!(matches!(
            directory.list_projects().await,
            Err(ApiError::PermissionDenied { .. })
        ));
    }
}

mod storage_tests {
    use super::*;

    /// A missing bucket is created before the upload
    #[tokio::test]
    async fn test_ensure_bucket_and_upload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/storage/v1/b/inventory-exports"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/b"))
            .and(query_param("project", "ops-project"))
            .and(body_json(json!({"name": "inventory-exports"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "inventory-exports"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/upload/storage/v1/b/inventory-exports/o"))
            .and(query_param("uploadType", "media"))
            .and(query_param("name", "inventory-run/compute.csv"))
            .and(header("content-type", "text/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "inventory-run/compute.csv"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.ensure_bucket("ops-project", "inventory-exports").await.unwrap();
        client
            .upload_object("inventory-exports", "inventory-run/compute.csv", "text/csv", b"a\n".to_vec())
            .await
            .unwrap();
    }
}

mod collection_tests {
    use super::*;

    /// One project denied, one healthy: the table still has the healthy rows
    #[tokio::test]
    async fn test_collect_firewalls_with_one_denied_project() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/good-project/global/firewalls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "name": "allow-ssh",
                    "network": "https://www.googleapis.com/compute/v1/projects/good-project/global/networks/default",
                    "priority": 1000,
                    "sourceRanges": ["35.235.240.0/20"],
                    "allowed": [{"IPProtocol": "tcp", "ports": ["22"]}],
                    "creationTimestamp": "2024-02-02T00:00:00.000-08:00"
                }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/locked-project/global/firewalls"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Required 'compute.firewalls.list' permission"}
            })))
            .mount(&server)
            .await;

        let collector = Collector::new(Arc::new(client_for(&server)));
        let projects = vec![
            Project::new("good-project", "Good"),
            Project::new("locked-project", "Locked"),
        ];
        let table = collector
            .collect(ResourceKind::Firewalls, &projects, &ScopeSet::default())
            .await;

        let rows = table.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Project");
        assert_eq!(
            rows[1],
            vec![
                "Good",
                "allow-ssh",
                "default",
                "1000",
                "35.235.240.0/20",
                "tcp:22",
                "",
                "2024-02-02T00:00:00.000-08:00"
            ]
        );
    }
}
