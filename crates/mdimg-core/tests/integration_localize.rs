//! Integration test: local HTTP server, real curl fetcher, real directory walk.
//!
//! Lays out a small tree of Markdown files, runs the batch over it and checks
//! both the saved images and the rewritten documents.

mod common;

use common::image_server::{self, Route};
use mdimg_core::batch::{self, BatchSummary};
use mdimg_core::config::MdimgConfig;
use mdimg_core::discover;
use mdimg_core::fetch::{CurlFetcher, Fetch, FetchError};
use mdimg_core::rewrite::{RewriteOptions, Rewriter};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn tag(src: &str) -> String {
    format!(r#"<img src="{}"/>"#, src)
}

#[test]
fn batch_localizes_images_across_tree() {
    let png: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    let base = image_server::start(vec![
        ("/noedgeai.com/y.png", Route::Ok(png.clone())),
        ("/noedgeai.com/photo", Route::Ok(b"jpeg-bytes".to_vec())),
        ("/noedgeai.com/moved.gif", Route::Redirect("/noedgeai.com/real.gif".to_string())),
        ("/noedgeai.com/real.gif", Route::Ok(b"GIF89a".to_vec())),
        ("/noedgeai.com/broken.png", Route::Status(500)),
    ]);

    let docs = tempdir().unwrap();
    let pics = tempdir().unwrap();
    fs::create_dir_all(docs.path().join("chapter")).unwrap();

    let a = docs.path().join("a.md");
    let b = docs.path().join("chapter").join("b.md");
    let untouched = docs.path().join("chapter").join("plain.md");
    let notes = docs.path().join("notes.txt");

    let y = format!("{}/noedgeai.com/y.png", base);
    let photo = format!("{}/noedgeai.com/photo?size=large", base);
    let moved = format!("{}/noedgeai.com/moved.gif", base);
    let broken = format!("{}/noedgeai.com/broken.png", base);
    let foreign = "https://example.com/logo.png";

    fs::write(&a, format!("Text {} more text", tag(&y))).unwrap();
    let b_original = format!(
        "{}\n{}\n{}\n{}\n",
        tag(foreign),
        tag(&broken),
        tag(&photo),
        tag(&moved)
    );
    fs::write(&b, &b_original).unwrap();
    let plain_original = format!("only {}", tag(foreign));
    fs::write(&untouched, &plain_original).unwrap();
    fs::write(&notes, tag(&y)).unwrap();

    let cfg = MdimgConfig::default();
    let rewriter = Rewriter::new(
        CurlFetcher::new(Duration::from_secs(cfg.timeout_secs)),
        RewriteOptions::new(&cfg, pics.path()),
    );

    let mut out = Vec::new();
    let summary = batch::run(&rewriter, discover::markdown_files(docs.path()), &mut out).unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            documents: 3,
            rewritten: 2,
            images_saved: 3,
            failures: 1,
        }
    );

    let a1 = pics.path().join("a-1.png");
    assert_eq!(fs::read(&a1).unwrap(), png);
    assert_eq!(
        fs::read_to_string(&a).unwrap(),
        format!("Text {} more text", tag(&a1.to_string_lossy()))
    );

    let b3 = pics.path().join("b-3.jpg");
    let b4 = pics.path().join("b-4.gif");
    assert_eq!(fs::read(&b3).unwrap(), b"jpeg-bytes");
    assert_eq!(fs::read(&b4).unwrap(), b"GIF89a");
    assert!(!pics.path().join("b-2.png").exists());
    assert_eq!(
        fs::read_to_string(&b).unwrap(),
        format!(
            "{}\n{}\n{}\n{}\n",
            tag(foreign),
            tag(&broken),
            tag(&b3.to_string_lossy()),
            tag(&b4.to_string_lossy())
        )
    );

    assert_eq!(fs::read_to_string(&untouched).unwrap(), plain_original);
    assert_eq!(fs::read_to_string(&notes).unwrap(), tag(&y));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(&broken));
    assert!(text.contains("HTTP 500"));
}

#[test]
fn rerun_overwrites_and_leaves_local_tags_alone() {
    let base = image_server::start(vec![("/noedgeai.com/y.png", Route::Ok(b"v1".to_vec()))]);
    let docs = tempdir().unwrap();
    let pics = tempdir().unwrap();
    let doc = docs.path().join("a.md");
    fs::write(&doc, tag(&format!("{}/noedgeai.com/y.png", base))).unwrap();

    let cfg = MdimgConfig::default();
    let rewriter = Rewriter::new(
        CurlFetcher::new(Duration::from_secs(5)),
        RewriteOptions::new(&cfg, pics.path()),
    );

    let first = batch::run(&rewriter, discover::markdown_files(docs.path()), &mut Vec::new()).unwrap();
    assert_eq!(first.rewritten, 1);
    let rewritten = fs::read_to_string(&doc).unwrap();

    // The local path no longer carries the marker, so a second run changes nothing.
    let second = batch::run(&rewriter, discover::markdown_files(docs.path()), &mut Vec::new()).unwrap();
    assert_eq!(second.rewritten, 0);
    assert_eq!(second.images_saved, 0);
    assert_eq!(fs::read_to_string(&doc).unwrap(), rewritten);
}

#[test]
fn curl_fetcher_success_requires_200() {
    let base = image_server::start(vec![
        ("/ok.png", Route::Ok(b"body".to_vec())),
        ("/created.png", Route::Status(201)),
        ("/gone.png", Route::Status(404)),
    ]);
    let fetcher = CurlFetcher::new(Duration::from_secs(5));

    assert_eq!(fetcher.fetch(&format!("{}/ok.png", base)).unwrap(), b"body");
    assert!(matches!(
        fetcher.fetch(&format!("{}/created.png", base)),
        Err(FetchError::Http(201))
    ));
    assert!(matches!(
        fetcher.fetch(&format!("{}/gone.png", base)),
        Err(FetchError::Http(404))
    ));
}

#[test]
fn curl_fetcher_times_out() {
    let base = image_server::start(vec![(
        "/slow.png",
        Route::Slow(Duration::from_secs(3), b"late".to_vec()),
    )]);
    let fetcher = CurlFetcher::new(Duration::from_secs(1));

    let err = fetcher.fetch(&format!("{}/slow.png", base)).unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {}", err);
}

#[test]
fn curl_fetcher_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let fetcher = CurlFetcher::new(Duration::from_secs(2));

    let err = fetcher
        .fetch(&format!("http://127.0.0.1:{}/noedgeai.com/x.png", port))
        .unwrap_err();
    assert!(matches!(err, FetchError::Curl(_)));
}
