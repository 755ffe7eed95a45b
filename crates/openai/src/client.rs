//! REST client for the OpenAI audio-transcription and chat-completion
//! endpoints, wrapped with [`reqwest`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

/// Chat model used for image description.
const VISION_MODEL: &str = "gpt-4o";
/// Transcription model for audio notes.
const TRANSCRIPTION_MODEL: &str = "whisper-1";
/// Token cap on the description completion.
const MAX_COMPLETION_TOKENS: u32 = 300;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Instruction sent with every image. The model must answer with one
/// comma-delimited line matching the parser's positional format; there
/// is no escaping for commas inside fields (a known wire-format gap).
const DESCRIBE_PROMPT: &str = "Describe the main object in the image as a single line of \
comma-separated values in exactly this order: object name, dominant color, height x width \
in centimeters, manufacturer, specification, description. Example answers: \
laptop,black,23x40,dell,aluminium body,a thin business laptop for everyday office work and \
phone,white,10x20,redmi,glass and plastic,a budget smartphone with a large bright display. \
Always name a manufacturer: if the exact one is unknown, give one well-known manufacturer \
of the same or similar products. The specification states the material used in fewer than \
5 words. The description states what the product is and its speciality in 10 to 20 clear \
and concise words. Use only parent color names in American English, never exact shades. \
If the image contains many objects, answer for the single largest object only. Reply with \
only the line in the example format, with no extra words, spaces, or subheadings.";

/// Client for the OpenAI REST API.
///
/// Holds a pooled [`reqwest::Client`]; cheap to share behind an `Arc`.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Errors from the OpenAI API layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// OpenAI returned a non-2xx status code.
    #[error("OpenAI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response that carried no usable message content.
    #[error("OpenAI response contained no usable content")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client against the public OpenAI API.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different API root (mock servers, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Transcribe an audio note to plain text.
    ///
    /// Sends a `POST /audio/transcriptions` multipart request with the
    /// raw audio bytes and returns the transcription text verbatim.
    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, OpenAiError> {
        let part = reqwest::multipart::Part::bytes(audio).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let parsed: TranscriptionResponse = Self::parse_response(response).await?;
        Ok(parsed.text)
    }

    /// Ask the vision model for the one-line catalog description of an
    /// image.
    ///
    /// The image travels base64-encoded inside a `data:` URL. Returns
    /// the first choice's message content with surrounding whitespace
    /// stripped; parsing into fields happens in `catalens-core`.
    pub async fn describe_image(&self, image: &[u8]) -> Result<String, OpenAiError> {
        let image_base64 = BASE64.encode(image);
        let body = serde_json::json!({
            "model": VISION_MODEL,
            "max_tokens": MAX_COMPLETION_TOKENS,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": DESCRIBE_PROMPT },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/jpg;base64,{image_base64}") },
                    },
                ],
            }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = Self::parse_response(response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(OpenAiError::EmptyResponse)
    }

    /// Check the HTTP status and deserialize the JSON body, converting
    /// non-2xx responses into [`OpenAiError::Api`].
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OpenAiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "OpenAI API call failed");
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
