use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AdminClientError {
    #[error("error computing the payload: `{0}`")]
    Encoder(String),
    #[error("transport error: `{0}`")]
    Transport(String),
    #[error("unsuccessful HTTP response: `{0}`. Body: `{1}`")]
    UnsuccessfulResponse(u16, String),
}
