//! Loads configuration once and builds the collaborator handles each command
//! needs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use sherpa_core::chat::TextGenerator;
use sherpa_core::config::{AppConfig, GeminiSecret};
use sherpa_core::enquiry::EnquiryRepository;
use sherpa_core::secret::SecretService;
use sherpa_core::speech::{AudioSink, SpeechPlayer};
use sherpa_infrastructure::{
    ConfigStorage, EnvOverrides, SecretServiceImpl, SecretStorage, SherpaPaths,
    SupabaseEnquiryRepository, WavFileSink,
};
use sherpa_interaction::{
    FallbackSpeechSynthesizer, FallbackTextGenerator, GeminiApiAgent, GeminiSpeechAgent,
};

/// Where played speech ends up.
pub enum SpeechOutput {
    /// The default output device, by name.
    Device(String),
    /// WAV files, for hosts without playback.
    Files(Arc<WavFileSink>),
}

impl SpeechOutput {
    /// Line to show the user after a successful playback.
    pub fn played_note(&self) -> Option<String> {
        match self {
            Self::Device(_) => None,
            Self::Files(sink) => sink
                .last_path()
                .map(|path| format!("Saved audio: {}", path.display())),
        }
    }
}

pub struct AppContext {
    pub paths: SherpaPaths,
    pub config: AppConfig,
    secrets: SecretServiceImpl,
}

impl AppContext {
    pub fn load(paths: SherpaPaths) -> Result<Self> {
        let config = ConfigStorage::new(&paths)?
            .load()
            .context("Failed to load config.toml")?;
        let secrets = SecretServiceImpl::new(SecretStorage::new(&paths)?, EnvOverrides::from_env());

        Ok(Self {
            paths,
            config,
            secrets,
        })
    }

    async fn gemini_secret(&self) -> Result<GeminiSecret> {
        let secrets = self.secrets.load_secrets().await?;
        secrets
            .gemini
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("Gemini API key missing: set GEMINI_API_KEY or gemini.api_key in secret.json")
            })
    }

    /// Fast and deep Gemini agents behind the fallback adapter.
    pub async fn text_generator(&self) -> Result<Arc<dyn TextGenerator>> {
        let secret = self.gemini_secret().await?;
        let fast = GeminiApiAgent::fast(&secret, &self.config.chat)?;
        let deep = GeminiApiAgent::deep(&secret, &self.config.chat)?;
        tracing::info!(
            "[Context] Text generation: fast={} deep={}",
            fast.model(),
            deep.model()
        );
        Ok(Arc::new(FallbackTextGenerator::new(
            Arc::new(fast),
            Arc::new(deep),
        )))
    }

    /// Speech player plus a handle describing where the audio goes.
    pub async fn speech_player(&self) -> Result<(SpeechPlayer, SpeechOutput)> {
        let secret = self.gemini_secret().await?;
        let agent = GeminiSpeechAgent::from_settings(&secret, &self.config.speech)
            .with_timeout(Duration::from_secs(self.config.chat.timeout_secs))?;
        let (sink, output) = self.speech_sink()?;
        let player = SpeechPlayer::new(
            Arc::new(FallbackSpeechSynthesizer::new(Arc::new(agent))),
            sink,
            self.config.speech.format(),
        );
        Ok((player, output))
    }

    /// The output device when one is available, WAV files otherwise.
    fn speech_sink(&self) -> Result<(Arc<dyn AudioSink>, SpeechOutput)> {
        #[cfg(feature = "playback")]
        if let Some(device) = sherpa_infrastructure::DeviceAudioSink::open() {
            let name = device.device_name().to_string();
            tracing::info!("[Context] Speech output: device {}", name);
            let sink: Arc<dyn AudioSink> = Arc::new(device);
            return Ok((sink, SpeechOutput::Device(name)));
        }

        let files = Arc::new(WavFileSink::new(self.speech_dir()?));
        tracing::info!("[Context] Speech output: WAV files in {}", files.dir().display());
        let sink: Arc<dyn AudioSink> = files.clone();
        Ok((sink, SpeechOutput::Files(files)))
    }

    pub async fn enquiry_repository(&self) -> Result<Arc<dyn EnquiryRepository>> {
        let secrets = self.secrets.load_secrets().await?;
        let supabase = secrets.supabase.ok_or_else(|| {
            anyhow!("Supabase credentials missing: set SUPABASE_URL and SUPABASE_ANON_KEY or the supabase section in secret.json")
        })?;
        Ok(Arc::new(SupabaseEnquiryRepository::new(
            &supabase,
            &self.config.enquiry,
        )?))
    }

    fn speech_dir(&self) -> Result<PathBuf> {
        match &self.config.speech.output_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(self.paths.speech_dir()?),
        }
    }
}
