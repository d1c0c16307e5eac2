use crate::{
    collectors::{
        projector,
        Collector,
        MetricBatch,
        UpstreamClient,
    },
    error::ScrapeError,
    metrics::*,
};
use eyre::{
    Context as _,
    Result,
};
use onlyoffice_exporter_config::ScrapeTarget;
use prometheus::{
    core::{
        Collector as _,
        Desc,
    },
    proto::MetricFamily,
    IntCounter,
};
use reqwest::StatusCode;
use std::{
    future::Future,
    pin::Pin,
    time::Instant,
};
use tokio::sync::Mutex;

/// Upper bound on how much of an error response body ends up in the log.
const MAX_ERROR_BODY_LEN: usize = 1024;

/// Scrapes the document server statistics endpoint on demand.
///
/// Each call to [`Collector::collect`] performs exactly one HTTP request.
/// Concurrent calls are serialized so that only one scrape is in flight at a
/// time; waiters run their own scrape once the lock is released.
pub struct Exporter {
    uri: String,
    client: UpstreamClient,
    descriptors: Descriptors,
    scrape_failures: IntCounter,
    lock: Mutex<()>,
}

impl Exporter {
    pub fn new(target: &ScrapeTarget) -> Result<Self> {
        let client = UpstreamClient::new(target.scrape_timeout, target.insecure)
            .wrap_err("Failed to create the HTTP client")?;
        let descriptors = Descriptors::new().wrap_err("Failed to create metric descriptors")?;
        let scrape_failures = scrape_failures_counter().wrap_err("Failed to create the scrape failure counter")?;

        if target.insecure {
            warn!("TLS certificate verification is disabled for {}", target.scrape_uri);
        }

        Ok(Self {
            uri: target.scrape_uri.clone(),
            client,
            descriptors,
            scrape_failures,
            lock: Mutex::new(()),
        })
    }

    /// Total number of failed scrape cycles since startup.
    pub fn scrape_failures(&self) -> u64 {
        self.scrape_failures.get()
    }

    async fn scrape(&self, batch: &mut MetricBatch) -> Result<(), ScrapeError> {
        let request = self.client.request(&self.uri)?;

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                batch.gauge(&self.descriptors.up, &[], 0.0)?;
                return Err(err);
            }
        };
        batch.gauge(&self.descriptors.up, &[], 1.0)?;

        if response.status != StatusCode::OK {
            let body = match response.body {
                Ok(data) => truncate(String::from_utf8_lossy(&data).into_owned()),
                Err(err) => err.to_string(),
            };
            return Err(ScrapeError::Status {
                status: response.status,
                body,
            });
        }

        let data = response.body.map_err(ScrapeError::Body)?;
        let stats = UpstreamStats::from_slice(&data)?;
        projector::project(&stats, &self.descriptors, batch)?;

        Ok(())
    }

    async fn collect_once(&self) -> Vec<MetricFamily> {
        let _guard = self.lock.lock().await;
        let started = Instant::now();

        let mut batch = MetricBatch::default();
        match self.scrape(&mut batch).await {
            Ok(()) => {
                debug!(uri = %self.uri, elapsed_ms = started.elapsed().as_millis() as u64, "Scrape finished");
            }
            Err(err) => {
                error!(uri = %self.uri, kind = err.kind(), "Error scraping onlyoffice: {}", err.report());
                self.scrape_failures.inc();
                batch.extend(self.scrape_failures.collect());
            }
        }

        batch.finish()
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY_LEN {
        let mut end = MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

impl Collector for Exporter {
    fn describe(&self) -> Vec<&Desc> {
        self.descriptors
            .iter()
            .map(MetricDescriptor::desc)
            .chain(self.scrape_failures.desc())
            .collect()
    }

    fn collect(&self) -> Pin<Box<dyn Future<Output = Vec<MetricFamily>> + Send + '_>> {
        Box::pin(self.collect_once())
    }

    fn name(&self) -> &'static str {
        "OnlyOffice"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::encode_text;
    use axum::{
        http::{
            header::CONTENT_TYPE,
            StatusCode as HttpStatus,
        },
        response::IntoResponse,
        routing::get,
        Router,
    };
    use std::{
        sync::{
            atomic::{
                AtomicUsize,
                Ordering,
            },
            Arc,
        },
        time::{
            Duration,
            Instant,
        },
    };
    use tokio::{
        io::{
            AsyncReadExt as _,
            AsyncWriteExt as _,
        },
        net::TcpListener,
    };

    const PAYLOAD: &str = r#"{
        "connectionsStat": {
            "hour": {"edit": {"min": 1, "avr": 2, "max": 3}, "view": {"min": 4, "avr": 5, "max": 6}},
            "day": {"edit": {"min": 0, "avr": 4, "max": 9}, "view": {"min": 1, "avr": 2, "max": 8}},
            "week": {"edit": {"min": 0, "avr": 3, "max": 12}, "view": {"min": 0, "avr": 2, "max": 10}},
            "month": {"edit": {"min": 0, "avr": 3, "max": 15}, "view": {"min": 0, "avr": 1, "max": 11}}
        },
        "licenseInfo": {"connections": 20, "hasLicense": true, "buildDate": "2024-01-10", "endDate": "2025-01-10"},
        "serverInfo": {"buildVersion": "8.0.1", "buildNumber": 31}
    }"#;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/info/info.json")
    }

    fn json_upstream() -> Router {
        Router::new().route(
            "/info/info.json",
            get(|| async { ([(CONTENT_TYPE, "application/json")], PAYLOAD) }),
        )
    }

    async fn serve_tls(router: Router) -> String {
        let tls = axum_server::tls_rustls::RustlsConfig::from_pem(
            include_bytes!("../../testdata/self-signed.crt").to_vec(),
            include_bytes!("../../testdata/self-signed.key").to_vec(),
        )
        .await
        .unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum_server::from_tcp_rustls(listener, tls)
                .serve(router.into_make_service())
                .await
                .unwrap();
        });
        format!("https://{addr}/info/info.json")
    }

    fn exporter_with(uri: String, scrape_timeout: Duration, insecure: bool) -> Exporter {
        let target = ScrapeTarget {
            scrape_uri: uri,
            scrape_timeout,
            insecure,
            ..Default::default()
        };
        Exporter::new(&target).unwrap()
    }

    fn exporter_for(uri: String) -> Exporter {
        exporter_with(uri, Duration::from_secs(5), false)
    }

    async fn scrape_text(exporter: &Exporter) -> String {
        encode_text(&exporter.collect().await).unwrap()
    }

    fn samples(text: &str) -> Vec<&str> {
        text.lines().filter(|line| !line.starts_with('#')).collect()
    }

    #[tokio::test]
    async fn successful_scrape_emits_all_samples() {
        let exporter = exporter_for(serve(json_upstream()).await);

        let text = scrape_text(&exporter).await;
        let samples = samples(&text);

        assert_eq!(samples.len(), 24 + 1 + 1 + 1);
        assert!(samples.contains(&"onlyoffice_up 1"));
        assert!(samples.contains(&"onlyoffice_edit_connections_last_hour{type=\"avr\"} 2"));
        assert!(samples.contains(&"onlyoffice_edit_connections_last_month{type=\"max\"} 15"));
        assert!(samples.contains(
            &"onlyoffice_license_info{build_date=\"2024-01-10\",connections=\"20\",end_date=\"2025-01-10\",has_license=\"true\"} 1"
        ));
        assert!(samples.contains(&"onlyoffice_server_info{build_number=\"31\",build_version=\"8.0.1\"} 1"));
        assert!(!text.contains("scrape_failures_total"));
        assert_eq!(exporter.scrape_failures(), 0);
    }

    #[tokio::test]
    async fn unreachable_upstream_reports_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let exporter = exporter_for(format!("http://{addr}/info/info.json"));

        let text = scrape_text(&exporter).await;

        assert_eq!(
            samples(&text),
            ["onlyoffice_up 0", "onlyoffice_exporter_scrape_failures_total 1"]
        );
        assert_eq!(exporter.scrape_failures(), 1);
    }

    #[tokio::test]
    async fn error_status_is_reachable_but_failed() {
        let upstream = Router::new().route(
            "/info/info.json",
            get(|| async { (HttpStatus::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let exporter = exporter_for(serve(upstream).await);

        let text = scrape_text(&exporter).await;

        assert_eq!(
            samples(&text),
            ["onlyoffice_up 1", "onlyoffice_exporter_scrape_failures_total 1"]
        );
    }

    #[tokio::test]
    async fn invalid_json_is_reachable_but_failed() {
        let upstream = Router::new().route("/info/info.json", get(|| async { "not json" }));
        let exporter = exporter_for(serve(upstream).await);

        let text = scrape_text(&exporter).await;
        assert_eq!(
            samples(&text),
            ["onlyoffice_up 1", "onlyoffice_exporter_scrape_failures_total 1"]
        );

        let text = scrape_text(&exporter).await;
        assert!(samples(&text).contains(&"onlyoffice_exporter_scrape_failures_total 2"));
        assert_eq!(exporter.scrape_failures(), 2);
    }

    #[tokio::test]
    async fn slow_upstream_is_cut_off_by_the_timeout() {
        let upstream = Router::new().route(
            "/info/info.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                PAYLOAD
            }),
        );
        let exporter = exporter_with(serve(upstream).await, Duration::from_millis(100), false);

        let started = Instant::now();
        let text = scrape_text(&exporter).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(
            samples(&text),
            ["onlyoffice_up 0", "onlyoffice_exporter_scrape_failures_total 1"]
        );
    }

    #[tokio::test]
    async fn truncated_body_is_reachable_but_failed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 4096\r\n\r\n{\"connectionsStat\":")
                .await
                .unwrap();
        });
        let exporter = exporter_for(format!("http://{addr}/info/info.json"));

        let text = scrape_text(&exporter).await;

        assert_eq!(
            samples(&text),
            ["onlyoffice_up 1", "onlyoffice_exporter_scrape_failures_total 1"]
        );
    }

    #[tokio::test]
    async fn insecure_accepts_self_signed_certificates() {
        let uri = serve_tls(json_upstream()).await;

        let insecure = exporter_with(uri.clone(), Duration::from_secs(5), true);
        assert_eq!(samples(&scrape_text(&insecure).await).len(), 27);
        assert_eq!(insecure.scrape_failures(), 0);

        let verifying = exporter_with(uri, Duration::from_secs(5), false);
        assert_eq!(
            samples(&scrape_text(&verifying).await),
            ["onlyoffice_up 0", "onlyoffice_exporter_scrape_failures_total 1"]
        );
    }

    #[tokio::test]
    async fn malformed_uri_emits_no_up_sample() {
        let exporter = exporter_for("not a uri".to_string());

        let text = scrape_text(&exporter).await;

        assert_eq!(samples(&text), ["onlyoffice_exporter_scrape_failures_total 1"]);
    }

    #[tokio::test]
    async fn failures_do_not_affect_the_next_cycle() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let upstream = Router::new().route(
            "/info/info.json",
            get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (HttpStatus::BAD_GATEWAY, "upstream down").into_response()
                    } else {
                        (HttpStatus::OK, PAYLOAD).into_response()
                    }
                }
            }),
        );
        let exporter = exporter_for(serve(upstream).await);

        assert_eq!(samples(&scrape_text(&exporter).await).len(), 2);
        assert_eq!(samples(&scrape_text(&exporter).await).len(), 27);
        assert_eq!(exporter.scrape_failures(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_collects_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let (current, max) = (in_flight.clone(), max_in_flight.clone());
        let upstream = Router::new().route(
            "/info/info.json",
            get(move || {
                let (current, max) = (current.clone(), max.clone());
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    max.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    PAYLOAD
                }
            }),
        );
        let exporter = Arc::new(exporter_for(serve(upstream).await));

        let handles = (0..5)
            .map(|_| {
                let exporter = exporter.clone();
                tokio::spawn(async move { encode_text(&exporter.collect().await).unwrap() })
            })
            .collect::<Vec<_>>();

        let mut total = 0;
        for handle in handles {
            total += samples(&handle.await.unwrap()).len();
        }

        assert_eq!(total, 5 * 27);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn describes_every_family() {
        let exporter = exporter_for("http://localhost/info/info.json".to_string());
        let names = exporter
            .describe()
            .into_iter()
            .map(|desc| desc.fq_name.clone())
            .collect::<Vec<_>>();

        assert_eq!(names.len(), 12);
        assert!(names.contains(&"onlyoffice_exporter_scrape_failures_total".to_string()));
        assert_eq!(exporter.name(), "OnlyOffice");
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = truncate("é".repeat(MAX_ERROR_BODY_LEN));
        assert!(body.ends_with("..."));
        assert!(body.len() <= MAX_ERROR_BODY_LEN + 3);
        assert_eq!(truncate("short".to_string()), "short");
    }
}
