//! Minimal S3-compatible endpoint for exercising `ObjectHandle` over real HTTP.
//!
//! Implements only path-style `PUT /{bucket}` and `PUT /{bucket}/{key}` with
//! `If-Match` / `If-None-Match` handling and S3 XML error bodies.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::put,
};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{
    collections::HashMap,
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::{net::TcpListener, sync::Mutex};

/// Precondition headers seen on one PUT object request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenPut {
    pub key: String,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
}

#[derive(Default)]
struct FakeData {
    buckets: HashMap<String, FakeBucket>,
    puts: Vec<SeenPut>,
    // Raw CreateBucket request bodies, in arrival order
    create_bucket_bodies: Vec<String>,
}

struct FakeBucket {
    owner: String,
    // key -> quoted etag
    objects: HashMap<String, String>,
}

#[derive(Clone)]
struct FakeState {
    data: Arc<Mutex<FakeData>>,
    access_keys: Arc<Vec<String>>,
    omit_etag: Arc<AtomicBool>,
}

pub struct FakeS3 {
    pub endpoint: String,
    state: FakeState,
}

impl FakeS3 {
    /// Start serving on an ephemeral port, accepting the given access keys
    pub async fn spawn(access_keys: &[&str]) -> Self {
        let state = FakeState {
            data: Arc::new(Mutex::new(FakeData::default())),
            access_keys: Arc::new(access_keys.iter().map(|k| k.to_string()).collect()),
            omit_etag: Arc::new(AtomicBool::new(false)),
        };

        let app = Router::new()
            .route("/{bucket}", put(create_bucket))
            // Path-style CreateBucket is sent as `PUT /{bucket}/`
            .route("/{bucket}/", put(create_bucket))
            .route("/{bucket}/{*key}", put(put_object))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{}", addr),
            state,
        }
    }

    /// Accept writes but leave the ETag header off the response
    pub fn omit_etag(&self, omit: bool) {
        self.state.omit_etag.store(omit, Ordering::SeqCst);
    }

    pub async fn puts(&self) -> Vec<SeenPut> {
        self.state.data.lock().await.puts.clone()
    }

    pub async fn create_bucket_bodies(&self) -> Vec<String> {
        self.state.data.lock().await.create_bucket_bodies.clone()
    }

    pub async fn etag_of(&self, bucket: &str, key: &str) -> Option<String> {
        let data = self.state.data.lock().await;
        data.buckets.get(bucket)?.objects.get(key).cloned()
    }
}

/// Access key id from a SigV4 `Authorization` header
fn access_key_id(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let credential = auth.split("Credential=").nth(1)?;
    credential.split('/').next().map(str::to_string)
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn same_etag(a: &str, b: &str) -> bool {
    a.trim_matches('"') == b.trim_matches('"')
}

impl FakeState {
    fn authorize(&self, headers: &HeaderMap) -> Result<String, Response> {
        match access_key_id(headers) {
            Some(key) if self.access_keys.contains(&key) => Ok(key),
            Some(_) => Err(s3_error(
                StatusCode::FORBIDDEN,
                "InvalidAccessKeyId",
                "The Access Key Id you provided does not exist in our records.",
            )),
            None => Err(s3_error(
                StatusCode::FORBIDDEN,
                "AccessDenied",
                "Access Denied.",
            )),
        }
    }
}

async fn create_bucket(
    State(state): State<FakeState>,
    Path(bucket): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let owner = match state.authorize(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };

    let mut data = state.data.lock().await;
    data.create_bucket_bodies
        .push(String::from_utf8_lossy(&body).into_owned());
    match data.buckets.get(&bucket) {
        Some(existing) if existing.owner == owner => s3_error(
            StatusCode::CONFLICT,
            "BucketAlreadyOwnedByYou",
            "Your previous request to create the named bucket succeeded and you already own it.",
        ),
        Some(_) => s3_error(
            StatusCode::CONFLICT,
            "BucketAlreadyExists",
            "The requested bucket name is not available.",
        ),
        None => {
            data.buckets.insert(
                bucket.clone(),
                FakeBucket {
                    owner,
                    objects: HashMap::new(),
                },
            );
            (StatusCode::OK, [(header::LOCATION, format!("/{}", bucket))]).into_response()
        }
    }
}

async fn put_object(
    State(state): State<FakeState>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = state.authorize(&headers) {
        return resp;
    }

    let if_match = header_str(&headers, "if-match");
    let if_none_match = header_str(&headers, "if-none-match");

    let mut data = state.data.lock().await;
    data.puts.push(SeenPut {
        key: key.clone(),
        if_match: if_match.clone(),
        if_none_match: if_none_match.clone(),
    });

    let Some(stored) = data.buckets.get_mut(&bucket) else {
        return s3_error(
            StatusCode::NOT_FOUND,
            "NoSuchBucket",
            "The specified bucket does not exist",
        );
    };

    let current = stored.objects.get(&key);
    let rejected = match (&if_none_match, &if_match) {
        (Some(v), _) if v == "*" && current.is_some() => true,
        (_, Some(expected)) => !current.is_some_and(|c| same_etag(c, expected)),
        _ => false,
    };
    if rejected {
        return s3_error(
            StatusCode::PRECONDITION_FAILED,
            "PreconditionFailed",
            "At least one of the pre-conditions you specified did not hold",
        );
    }

    let etag = format!("\"{:x}\"", md5::compute(&body));
    stored.objects.insert(key, etag.clone());

    if state.omit_etag.load(Ordering::SeqCst) {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::OK, [(header::ETAG, etag)]).into_response()
    }
}

fn s3_error(status: StatusCode, code: &str, message: &str) -> Response {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let events = [
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        Event::Start(BytesStart::new("Error")),
        Event::Start(BytesStart::new("Code")),
        Event::Text(BytesText::new(code)),
        Event::End(BytesEnd::new("Code")),
        Event::Start(BytesStart::new("Message")),
        Event::Text(BytesText::new(message)),
        Event::End(BytesEnd::new("Message")),
        Event::Start(BytesStart::new("RequestId")),
        Event::Text(BytesText::new("fake-request")),
        Event::End(BytesEnd::new("RequestId")),
        Event::End(BytesEnd::new("Error")),
    ];
    for event in events {
        writer.write_event(event).unwrap();
    }
    let body = writer.into_inner().into_inner();

    (status, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
}
