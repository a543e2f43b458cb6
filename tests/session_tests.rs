// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the camera session state
//!
//! These drive `SessionState` through the same sequences the UI does:
//! permission, selection toggles, captures, thumbnail expiry and recording.

use kameraku::app::{Notice, RecordingState, SessionState};
use kameraku::backends::camera::types::Facing;
use kameraku::errors::PermissionError;
use kameraku::flash::FlashMode;
use kameraku::permissions::CameraPermission;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

fn ready_session() -> SessionState {
    SessionState {
        permission: CameraPermission::Granted,
        provider_ready: true,
        ..Default::default()
    }
}

#[test]
fn test_denied_permission_never_binds() {
    let mut session = SessionState {
        permission: CameraPermission::Denied(PermissionError::Denied),
        provider_ready: true,
        ..Default::default()
    };

    assert!(session.binding().is_none());
    assert!(!session.begin_capture(), "Capture must be refused");

    // Toggling controls never makes the binder active
    session.toggle_facing();
    session.toggle_flash();
    assert!(session.binding().is_none());
}

#[test]
fn test_pending_permission_never_binds() {
    let session = SessionState {
        provider_ready: true,
        ..Default::default()
    };
    assert!(session.binding().is_none());
}

#[test]
fn test_binding_waits_for_provider() {
    let mut session = ready_session();
    session.provider_ready = false;
    assert!(session.binding().is_none());

    session.provider_ready = true;
    let request = session.binding().expect("binding after provider is ready");
    assert_eq!(request.facing, Facing::Back);
    assert_eq!(request.flash, FlashMode::Off);
}

#[test]
fn test_toggles_change_the_binding() {
    let mut session = ready_session();
    let initial = session.binding();

    assert_eq!(session.toggle_facing(), Facing::Front);
    assert_ne!(session.binding(), initial);
    assert_eq!(session.toggle_facing(), Facing::Back);
    assert_eq!(session.binding(), initial);

    assert_eq!(session.toggle_flash(), FlashMode::On);
    assert_eq!(session.binding().map(|b| b.flash), Some(FlashMode::On));
    assert_eq!(session.toggle_flash(), FlashMode::Off);
}

#[test]
fn test_torch_does_not_rebind() {
    let mut session = ready_session();
    let before = session.binding();
    assert!(session.toggle_torch());
    assert_eq!(session.binding(), before);
    assert!(!session.toggle_torch());
}

#[test]
fn test_capture_then_thumbnail_expires() {
    let mut session = ready_session();
    let t0 = Instant::now();

    assert!(session.begin_capture());
    assert!(!session.begin_capture(), "Second press while saving is ignored");

    let path = PathBuf::from("/tmp/IMG_1.jpg");
    let (notice, generation) = session.finish_capture(Ok(path.clone()), t0);
    assert_eq!(notice, Notice::PhotoSaved(path));
    assert!(!notice.is_error());
    assert!(!session.capture_in_flight);

    let generation = generation.expect("saved photo has a generation");
    assert!(session.photo_visible());
    assert!(!session.expire_photo(generation, t0 + Duration::from_secs(1)));
    assert!(session.photo_visible());
    assert!(session.expire_photo(generation, t0 + Duration::from_secs(3)));
    assert!(!session.photo_visible());
}

#[test]
fn test_new_photo_outlives_old_timer() {
    let mut session = ready_session();
    let t0 = Instant::now();

    let first = session.show_photo_at(PathBuf::from("/tmp/IMG_1.jpg"), t0);
    let t1 = t0 + Duration::from_secs(2);
    let second = session.show_photo_at(PathBuf::from("/tmp/IMG_2.jpg"), t1);

    // The first timer fires at t0 + 3s and must leave the newer photo alone
    assert!(!session.expire_photo(first, t0 + Duration::from_secs(3)));
    assert!(session.photo_visible());
    assert!(session.expire_photo(second, t1 + Duration::from_secs(3)));
}

#[test]
fn test_failed_capture_shows_no_thumbnail() {
    let mut session = ready_session();
    assert!(session.begin_capture());

    let (notice, generation) = session.finish_capture(Err("disk full".into()), Instant::now());
    assert_eq!(notice, Notice::PhotoFailed("disk full".into()));
    assert!(notice.is_error());
    assert!(generation.is_none());
    assert!(!session.photo_visible());
    assert!(session.begin_capture(), "Capture slot is released after failure");
}

#[test]
fn test_record_start_stop() {
    let mut session = ready_session();
    let path = PathBuf::from("/tmp/VID_1.mp4");
    let (tx, mut rx) = oneshot::channel();

    assert!(session.start_recording(path.clone(), tx));
    assert!(session.recording.is_recording());
    assert_eq!(session.recording.file_path(), Some(path.as_path()));

    let (tx2, _rx2) = oneshot::channel();
    assert!(!session.start_recording(PathBuf::from("/tmp/VID_2.mp4"), tx2));

    assert!(session.stop_recording());
    assert!(matches!(session.recording, RecordingState::Idle));
    assert!(rx.try_recv().is_ok(), "Recorder receives the stop signal");
    assert!(!session.stop_recording(), "Nothing left to stop");

    let notice = session.finish_recording(&path, Ok(false));
    assert_eq!(notice, Notice::VideoSavedSilent(path));
}

#[test]
fn test_switching_camera_ends_recording() {
    let mut session = ready_session();
    let path = PathBuf::from("/tmp/VID_1.mp4");
    let (tx, mut rx) = oneshot::channel();
    assert!(session.start_recording(path.clone(), tx));

    let before = session.binding();
    session.toggle_facing();
    assert_ne!(session.binding(), before);
    assert!(
        matches!(session.recording, RecordingState::Idle),
        "Recording must not outlive its session"
    );
    assert!(rx.try_recv().is_ok(), "Recorder receives the stop signal");

    let notice = session.finish_recording(&path, Ok(true));
    assert_eq!(notice, Notice::VideoSaved(path));
}

#[test]
fn test_recording_ending_on_its_own_clears_state() {
    let mut session = ready_session();
    let path = PathBuf::from("/tmp/VID_1.mp4");
    let (tx, _rx) = oneshot::channel();
    session.start_recording(path.clone(), tx);

    let notice = session.finish_recording(&path, Err("pipeline error".into()));
    assert_eq!(notice, Notice::VideoFailed("pipeline error".into()));
    assert!(!session.recording.is_recording());
}

#[test]
fn test_late_finalize_keeps_newer_recording() {
    let mut session = ready_session();
    let old = PathBuf::from("/tmp/VID_1.mp4");
    let new = PathBuf::from("/tmp/VID_2.mp4");

    let (tx, _rx) = oneshot::channel();
    session.start_recording(old.clone(), tx);
    session.stop_recording();

    let (tx, _rx) = oneshot::channel();
    session.start_recording(new.clone(), tx);

    let notice = session.finish_recording(&old, Ok(true));
    assert_eq!(notice, Notice::VideoSaved(old));
    assert_eq!(session.recording.file_path(), Some(new.as_path()));
}

#[test]
fn test_notice_messages() {
    assert_eq!(
        Notice::PhotoSaved(PathBuf::from("/tmp/a.jpg")).message(),
        "Photo saved"
    );
    assert!(
        Notice::VideoFailed("boom".into())
            .message()
            .contains("boom")
    );
    assert!(Notice::NoFlash(None).is_error());
}
