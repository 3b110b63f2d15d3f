// tests/sync_workflow_test.rs

use mockito::{Matcher, Server};
use ncm_cloud_sync::{config::AppConfig, error::AppError, run_with_config};
use std::{
    fs,
    path::Path,
    sync::{Arc, atomic::AtomicBool},
};
use tempfile::tempdir;

/// 构造一个带 RIFF INFO 标签的最小 WAV 文件
fn wav_with_info(title: &str, artist: &str, album: Option<&str>) -> Vec<u8> {
    fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        if body.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1u16.to_le_bytes());
    fmt.extend_from_slice(&1u16.to_le_bytes());
    fmt.extend_from_slice(&8000u32.to_le_bytes());
    fmt.extend_from_slice(&8000u32.to_le_bytes());
    fmt.extend_from_slice(&1u16.to_le_bytes());
    fmt.extend_from_slice(&8u16.to_le_bytes());

    let mut info = b"INFO".to_vec();
    info.extend(chunk(b"INAM", title.as_bytes()));
    info.extend(chunk(b"IART", artist.as_bytes()));
    if let Some(album) = album {
        info.extend(chunk(b"IPRD", album.as_bytes()));
    }

    let mut body = b"WAVE".to_vec();
    body.extend(chunk(b"fmt ", &fmt));
    body.extend(chunk(b"LIST", &info));
    body.extend(chunk(b"data", &[0x80; 16]));
    chunk(b"RIFF", &body)
}

fn config_for(server: &Server, music_dir: &Path, cookie_path: &Path) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        api_base: server.url(),
        music_dir: music_dir.to_path_buf(),
        cookie_path: cookie_path.to_path_buf(),
        ..AppConfig::default()
    })
}

async fn mock_logged_in(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/login/status")
        .match_query(Matcher::UrlEncoded("cookie".into(), "MUSIC_U=abc".into()))
        .with_body(r#"{"data": {"code": 200, "profile": {"userId": 7, "nickname": "tester"}}}"#)
        .create_async()
        .await
}

async fn mock_cloud_with_song_z(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/user/cloud")
        .match_query(Matcher::UrlEncoded("offset".into(), "0".into()))
        .with_body(
            r#"{"code": 200, "count": 1, "hasMore": false, "data": [
                {"songId": 1, "songName": "SongZ", "album": "AlbumX", "artist": "ArtistY"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await
}

fn seed_library(music_dir: &Path) {
    fs::create_dir_all(music_dir.join("sub")).unwrap();
    fs::write(
        music_dir.join("z.wav"),
        wav_with_info("SongZ", "ArtistY", Some("AlbumX")),
    )
    .unwrap();
    fs::write(
        music_dir.join("sub").join("w.wav"),
        wav_with_info("SongW", "ArtistQ", None),
    )
    .unwrap();
    fs::write(music_dir.join("cover.jpg"), b"not audio").unwrap();
}

#[tokio::test]
async fn test_only_missing_song_is_uploaded() {
    let mut server = Server::new_async().await;
    let workdir = tempdir().unwrap();
    let music_dir = workdir.path().join("music");
    let cookie_path = workdir.path().join("cookie.txt");
    seed_library(&music_dir);
    fs::write(&cookie_path, "MUSIC_U=abc").unwrap();
    if std::env::var("NCM_COOKIE").is_ok() {
        return;
    }

    let status = mock_logged_in(&mut server).await;
    let cloud = mock_cloud_with_song_z(&mut server).await;
    let upload = server
        .mock("POST", "/cloud")
        .match_query(Matcher::UrlEncoded("cookie".into(), "MUSIC_U=abc".into()))
        .with_body(r#"{"code": 200}"#)
        .expect(1)
        .create_async()
        .await;

    let report = run_with_config(
        config_for(&server, &music_dir, &cookie_path),
        Arc::new(AtomicBool::new(false)),
    )
    .await
    .unwrap();

    status.assert_async().await;
    cloud.assert_async().await;
    upload.assert_async().await;
    assert_eq!(report.scanned, 2);
    assert_eq!(report.already_in_cloud, 1);
    assert_eq!(report.total, 1);
    assert_eq!(report.success, 1);
    assert!(report.did_all_succeed());
}

#[tokio::test]
async fn test_failed_upload_is_retried_then_reported() {
    let mut server = Server::new_async().await;
    let workdir = tempdir().unwrap();
    let music_dir = workdir.path().join("music");
    let cookie_path = workdir.path().join("cookie.txt");
    seed_library(&music_dir);
    fs::write(&cookie_path, "MUSIC_U=abc").unwrap();
    if std::env::var("NCM_COOKIE").is_ok() {
        return;
    }

    let _status = mock_logged_in(&mut server).await;
    let _cloud = mock_cloud_with_song_z(&mut server).await;
    let upload = server
        .mock("POST", "/cloud")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"code": 500, "msg": "服务器繁忙"}"#)
        .expect(3)
        .create_async()
        .await;

    let report = run_with_config(
        config_for(&server, &music_dir, &cookie_path),
        Arc::new(AtomicBool::new(false)),
    )
    .await
    .unwrap();

    upload.assert_async().await;
    assert_eq!(report.success, 0);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("w.wav"));
}

#[tokio::test]
async fn test_dry_run_does_not_upload() {
    let mut server = Server::new_async().await;
    let workdir = tempdir().unwrap();
    let music_dir = workdir.path().join("music");
    let cookie_path = workdir.path().join("cookie.txt");
    seed_library(&music_dir);
    fs::write(&cookie_path, "MUSIC_U=abc").unwrap();
    if std::env::var("NCM_COOKIE").is_ok() {
        return;
    }

    let _status = mock_logged_in(&mut server).await;
    let _cloud = mock_cloud_with_song_z(&mut server).await;
    let upload = server
        .mock("POST", "/cloud")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = AppConfig {
        dry_run: true,
        ..(*config_for(&server, &music_dir, &cookie_path)).clone()
    };
    let report = run_with_config(Arc::new(config), Arc::new(AtomicBool::new(false)))
        .await
        .unwrap();

    upload.assert_async().await;
    assert!(report.dry_run);
    assert_eq!(report.total, 1);
    assert_eq!(report.success, 0);
}

#[tokio::test]
async fn test_qr_login_when_no_cookie_saved() {
    let mut server = Server::new_async().await;
    let workdir = tempdir().unwrap();
    let music_dir = workdir.path().join("music");
    let cookie_path = workdir.path().join("state").join("cookie.txt");
    fs::create_dir_all(&music_dir).unwrap();
    if std::env::var("NCM_COOKIE").is_ok() {
        return;
    }

    let _key = server
        .mock("GET", "/login/qr/key")
        .match_query(Matcher::Any)
        .with_body(r#"{"code": 200, "data": {"unikey": "k-1"}}"#)
        .create_async()
        .await;
    let _create = server
        .mock("GET", "/login/qr/create")
        .match_query(Matcher::Any)
        .with_body(r#"{"code": 200, "data": {"qrurl": "https://music.163.com/login?codekey=k-1"}}"#)
        .create_async()
        .await;
    let check = server
        .mock("GET", "/login/qr/check")
        .match_query(Matcher::UrlEncoded("key".into(), "k-1".into()))
        .with_body(r#"{"code": 803, "message": "授权登陆成功", "cookie": "MUSIC_U=abc"}"#)
        .expect(1)
        .create_async()
        .await;
    let _cloud = server
        .mock("GET", "/user/cloud")
        .match_query(Matcher::UrlEncoded("cookie".into(), "MUSIC_U=abc".into()))
        .with_body(r#"{"code": 200, "hasMore": false, "data": []}"#)
        .create_async()
        .await;

    let report = run_with_config(
        config_for(&server, &music_dir, &cookie_path),
        Arc::new(AtomicBool::new(false)),
    )
    .await
    .unwrap();

    check.assert_async().await;
    assert_eq!(fs::read_to_string(&cookie_path).unwrap(), "MUSIC_U=abc");
    assert_eq!(report.scanned, 0);
    assert_eq!(report.total, 0);
}

#[tokio::test]
async fn test_expired_qr_code_aborts_run() {
    let mut server = Server::new_async().await;
    let workdir = tempdir().unwrap();
    let cookie_path = workdir.path().join("cookie.txt");
    if std::env::var("NCM_COOKIE").is_ok() {
        return;
    }

    let _key = server
        .mock("GET", "/login/qr/key")
        .match_query(Matcher::Any)
        .with_body(r#"{"code": 200, "data": {"unikey": "k-2"}}"#)
        .create_async()
        .await;
    let _create = server
        .mock("GET", "/login/qr/create")
        .match_query(Matcher::Any)
        .with_body(r#"{"code": 200, "data": {"qrurl": "https://music.163.com/login?codekey=k-2"}}"#)
        .create_async()
        .await;
    let _check = server
        .mock("GET", "/login/qr/check")
        .match_query(Matcher::Any)
        .with_body(r#"{"code": 800, "message": "二维码不存在或已过期"}"#)
        .create_async()
        .await;
    let cloud = server
        .mock("GET", "/user/cloud")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = run_with_config(
        config_for(&server, workdir.path(), &cookie_path),
        Arc::new(AtomicBool::new(false)),
    )
    .await;

    assert!(matches!(result, Err(AppError::LoginRejected(_))));
    cloud.assert_async().await;
    assert!(!cookie_path.exists());
}

/// 服务端拒绝已保存的 Cookie (HTTP 401 或业务码 301) 时应重新扫码登录并覆盖 Cookie 文件
#[tokio::test]
async fn test_rejected_saved_cookie_triggers_qr_login() {
    if std::env::var("NCM_COOKIE").is_ok() {
        return;
    }
    let rejections: [(usize, &str); 2] = [(401, "Unauthorized"), (200, r#"{"code": 301, "msg": "需要登录"}"#)];
    for (status_code, body) in rejections {
        let mut server = Server::new_async().await;
        let workdir = tempdir().unwrap();
        let music_dir = workdir.path().join("music");
        let cookie_path = workdir.path().join("cookie.txt");
        fs::create_dir_all(&music_dir).unwrap();
        fs::write(&cookie_path, "MUSIC_U=stale").unwrap();

        let status = server
            .mock("GET", "/login/status")
            .match_query(Matcher::UrlEncoded("cookie".into(), "MUSIC_U=stale".into()))
            .with_status(status_code)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;
        let key = server
            .mock("GET", "/login/qr/key")
            .match_query(Matcher::Any)
            .with_body(r#"{"code": 200, "data": {"unikey": "k-3"}}"#)
            .expect(1)
            .create_async()
            .await;
        let _create = server
            .mock("GET", "/login/qr/create")
            .match_query(Matcher::Any)
            .with_body(r#"{"code": 200, "data": {"qrurl": "https://music.163.com/login?codekey=k-3"}}"#)
            .create_async()
            .await;
        let _check = server
            .mock("GET", "/login/qr/check")
            .match_query(Matcher::Any)
            .with_body(r#"{"code": 803, "message": "授权登陆成功", "cookie": "MUSIC_U=fresh"}"#)
            .create_async()
            .await;
        let cloud = server
            .mock("GET", "/user/cloud")
            .match_query(Matcher::UrlEncoded("cookie".into(), "MUSIC_U=fresh".into()))
            .with_body(r#"{"code": 200, "hasMore": false, "data": []}"#)
            .expect(1)
            .create_async()
            .await;

        run_with_config(
            config_for(&server, &music_dir, &cookie_path),
            Arc::new(AtomicBool::new(false)),
        )
        .await
        .unwrap();

        status.assert_async().await;
        key.assert_async().await;
        cloud.assert_async().await;
        assert_eq!(fs::read_to_string(&cookie_path).unwrap(), "MUSIC_U=fresh");
    }
}
