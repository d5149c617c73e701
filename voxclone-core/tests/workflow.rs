
use fixture::{Fixture, BUCKET, REGION};
use uuid::Uuid;
use voxclone_core::provider::{MockBehavior, MockVoiceProvider, VoiceSettings};
use voxclone_core::workflow::{ErrorKind, Stage, WorkflowError};

fn url_prefix() -> String {
    format!("https://{BUCKET}.s3.{REGION}.amazonaws.com/")
}

#[tokio::test]
async fn test_clone_and_speak_end_to_end() {
    let fixture = Fixture::new();
    fixture.provider.push_voice_id("v123");
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;

    let (voice, speech) = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap();

    assert_eq!(voice.voice_id, "v123");
    assert_eq!(voice.name, "Test");
    assert_eq!(voice.description.as_deref(), Some(""));

    let sample_key = voice.sample_s3_url.strip_prefix(&url_prefix()).unwrap();
    let token = sample_key
        .strip_prefix("voice-samples/")
        .and_then(|rest| rest.strip_suffix("-sample.wav"))
        .unwrap();
    assert!(Uuid::parse_str(token).is_ok());

    assert_eq!(speech.text_content.as_deref(), Some("Hello world"));
    assert_eq!(speech.cloned_voice_id, Some(voice.id));
    let speech_key = speech.s3_url.strip_prefix(&url_prefix()).unwrap();
    let token = speech_key
        .strip_prefix("speech-outputs/v123/")
        .and_then(|rest| rest.strip_suffix(".mp3"))
        .unwrap();
    assert!(Uuid::parse_str(token).is_ok());
    assert_ne!(voice.sample_s3_url, speech.s3_url);

    // Both objects were archived with the bytes that went through the pipeline
    let archived_speech = fixture.storage.get(speech_key).unwrap();
    assert_eq!(
        archived_speech.bytes,
        MockVoiceProvider::audio_for("v123", "Hello world")
    );
    assert_eq!(archived_speech.content_type, "audio/mpeg");
    assert_eq!(
        fixture.storage.get(sample_key).unwrap().bytes,
        std::fs::read(&request.sample_path).unwrap()
    );

    assert_eq!(fixture.records.voices(), vec![voice.clone()]);
    assert_eq!(fixture.records.speech_for_voice(voice.id), vec![speech]);
}

#[tokio::test]
async fn test_clone_receives_local_sample_path() {
    let fixture = Fixture::new();
    let mut request = fixture.request("Narrator", "take1.mp3", "Hi");
    request.voice_description = "deep and calm".to_string();
    let mut session = fixture.session().await;

    fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap();

    let calls = fixture.provider.calls();
    assert!(matches!(
        &calls[0],
        voxclone_core::provider::mock::MockCall::Clone { name, description, sample_path }
            if name == "Narrator" && description == "deep and calm" && sample_path == &request.sample_path
    ));
}

#[tokio::test]
async fn test_unreadable_sample_stops_before_any_external_call() {
    let fixture = Fixture::new();
    let mut request = fixture.request("Test", "sample.wav", "Hello world");
    request.sample_path = request.sample_path.with_file_name("missing.wav");
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::SampleUnreadable { .. }));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(fixture.storage.upload_count(), 0);
    assert_eq!(fixture.provider.clone_count(), 0);
    assert!(fixture.records.voices().is_empty());
}

#[tokio::test]
async fn test_sample_upload_failure_skips_cloning() {
    let fixture = Fixture::new();
    fixture.storage.set_fail_uploads(true);
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::ArchiveSample);
    assert_eq!(err.kind(), ErrorKind::ExternalService);
    assert_eq!(fixture.provider.clone_count(), 0);
    assert!(fixture.records.voices().is_empty());
}

#[tokio::test]
async fn test_clone_failure_leaves_archived_sample_and_no_records() {
    let fixture = Fixture::with_behavior(MockBehavior::CloneFails);
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::CloneVoice);
    assert_eq!(err.kind(), ErrorKind::ExternalService);

    let keys = fixture.storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("voice-samples/"));
    assert!(keys[0].ends_with("-sample.wav"));

    assert!(fixture.records.voices().is_empty());
    assert!(fixture.records.speech().is_empty());
    assert_eq!(fixture.provider.synthesize_count(), 0);
}

#[tokio::test]
async fn test_voice_persistence_failure_stops_before_synthesis() {
    let fixture = Fixture::new();
    fixture.records.set_fail_writes(true);
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::PersistVoice);
    assert_eq!(err.kind(), ErrorKind::Persistence);
    // Already-performed external calls are not compensated
    assert_eq!(fixture.provider.clone_count(), 1);
    assert_eq!(fixture.storage.keys().len(), 1);
    assert_eq!(fixture.provider.synthesize_count(), 0);
}

#[tokio::test]
async fn test_synthesis_failure_keeps_voice_without_speech() {
    let fixture = Fixture::with_behavior(MockBehavior::SynthesisFails);
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Synthesize);
    let voices = fixture.records.voices();
    assert_eq!(voices.len(), 1);
    assert!(fixture.records.speech_for_voice(voices[0].id).is_empty());
    assert_eq!(fixture.storage.keys().len(), 1);
}

#[tokio::test]
async fn test_speech_record_failure_keeps_voice_and_both_objects() {
    let fixture = Fixture::new();
    fixture.records.set_fail_speech_writes(true);
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::PersistSpeech);
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(fixture.records.voices().len(), 1);
    assert!(fixture.records.speech().is_empty());
    assert_eq!(fixture.storage.keys().len(), 2);
    assert_eq!(fixture.provider.synthesize_count(), 1);
}

#[tokio::test]
async fn test_speech_upload_failure_keeps_voice_record() {
    let fixture = Fixture::new();
    fixture.provider.push_voice_id("v9");
    let mut session = fixture.session().await;

    // Clone once successfully, then make storage fail for the speak-only path
    let request = fixture.request("Test", "sample.wav", "first");
    fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap();
    fixture.storage.set_fail_uploads(true);

    let err = fixture
        .workflow
        .speak(session.as_mut(), "v9", "second")
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::ArchiveSpeech);
    assert_eq!(fixture.records.voices().len(), 1);
    assert_eq!(fixture.records.speech().len(), 1);
}

#[tokio::test]
async fn test_speak_with_unknown_voice_never_calls_provider() {
    let fixture = Fixture::new();
    let mut session = fixture.session().await;

    let err = fixture
        .workflow
        .speak(session.as_mut(), "does-not-exist", "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::VoiceNotFound(ref id) if id == "does-not-exist"));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(fixture.provider.synthesize_count(), 0);
    assert_eq!(fixture.storage.upload_count(), 0);
}

#[tokio::test]
async fn test_speak_reuses_existing_voice() {
    let fixture = Fixture::new();
    fixture.provider.push_voice_id("v123");
    let request = fixture.request("Test", "sample.wav", "Hello world");
    let mut session = fixture.session().await;
    let (voice, first) = fixture
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .unwrap();

    let second = fixture
        .workflow
        .speak(session.as_mut(), "v123", "Again")
        .await
        .unwrap();

    assert_eq!(second.cloned_voice_id, Some(voice.id));
    assert_ne!(second.id, first.id);
    assert_ne!(second.s3_url, first.s3_url);
    assert!(second
        .s3_url
        .starts_with(&format!("{}speech-outputs/v123/", url_prefix())));
    assert_eq!(fixture.provider.clone_count(), 1);
    assert_eq!(fixture.records.speech_for_voice(voice.id).len(), 2);
}

#[tokio::test]
async fn test_concurrent_pipelines_with_same_filename() {
    let fixture = Fixture::new();
    let request_a = fixture.request("Alice", "sample.wav", "one");
    let request_b = fixture.request("Bob", "sample.wav", "two");
    let mut session_a = fixture.session().await;
    let mut session_b = fixture.session().await;

    let (a, b) = tokio::join!(
        fixture
            .workflow
            .clone_and_speak(session_a.as_mut(), &request_a),
        fixture
            .workflow
            .clone_and_speak(session_b.as_mut(), &request_b),
    );
    let (voice_a, speech_a) = a.unwrap();
    let (voice_b, speech_b) = b.unwrap();

    assert_ne!(voice_a.id, voice_b.id);
    assert_ne!(speech_a.id, speech_b.id);
    assert_ne!(voice_a.sample_s3_url, voice_b.sample_s3_url);
    assert_ne!(speech_a.s3_url, speech_b.s3_url);
    assert_eq!(fixture.storage.keys().len(), 4);
    assert_eq!(fixture.records.voices().len(), 2);
    assert_eq!(fixture.records.speech().len(), 2);
}

#[tokio::test]
async fn test_list_voices_returns_every_clone() {
    let fixture = Fixture::new();
    let mut session = fixture.session().await;
    for name in ["One", "Two"] {
        let request = fixture.request(name, "s.wav", "text");
        fixture
            .workflow
            .clone_and_speak(session.as_mut(), &request)
            .await
            .unwrap();
    }

    let voices = fixture.workflow.list_voices(session.as_mut()).await.unwrap();
    let names: Vec<&str> = voices.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_tune_forwards_settings_without_storing_anything() {
    let fixture = Fixture::new();

    let applied = fixture
        .workflow
        .tune("v1", VoiceSettings::new(0.3, 0.9))
        .await
        .unwrap();

    assert_eq!(applied, VoiceSettings::new(0.3, 0.9));
    assert_eq!(fixture.provider.tune_count(), 1);
    assert!(fixture.records.voices().is_empty());
}

#[tokio::test]
async fn test_tune_rejects_out_of_range_settings() {
    let fixture = Fixture::new();

    let err = fixture
        .workflow
        .tune("v1", VoiceSettings::new(1.1, 0.9))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::InvalidSettings(_)));
    assert_eq!(fixture.provider.tune_count(), 0);
}

#[tokio::test]
async fn test_tune_provider_rejection_still_echoes_settings() {
    let fixture = Fixture::with_behavior(MockBehavior::TuneFails);

    let applied = fixture
        .workflow
        .tune("v1", VoiceSettings::default())
        .await
        .unwrap();

    assert_eq!(applied, VoiceSettings::default());
    assert_eq!(fixture.provider.tune_count(), 1);
}
