//! KYC submission and review endpoints

use api_types::kyc::{Kyc, KycReview};
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Multipart, Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

struct FilePart {
    file_name: Option<String>,
    bytes: Bytes,
}

/// Fields of the multipart upload form.
#[derive(Default)]
struct UploadForm {
    document_type: Option<String>,
    document_number: Option<String>,
    business_address: Option<String>,
    document_file: Option<FilePart>,
    selfie_file: Option<FilePart>,
    business_registration: Option<FilePart>,
}

fn multipart_error(err: impl std::fmt::Display) -> ServerError {
    ServerError::Generic(format!("invalid upload: {err}"))
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                "document_type" => {
                    form.document_type = Some(field.text().await.map_err(multipart_error)?)
                }
                "document_number" => {
                    form.document_number = Some(field.text().await.map_err(multipart_error)?)
                }
                "business_address" => {
                    form.business_address = Some(field.text().await.map_err(multipart_error)?)
                }
                "document_file" | "selfie_file" | "business_registration" => {
                    let file_name = field.file_name().map(str::to_owned);
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    // Browsers send empty parts for untouched file inputs.
                    if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                        continue;
                    }
                    let part = Some(FilePart { file_name, bytes });
                    match name.as_str() {
                        "document_file" => form.document_file = part,
                        "selfie_file" => form.selfie_file = part,
                        _ => form.business_registration = part,
                    }
                }
                other => tracing::debug!("ignoring unknown upload field {other:?}"),
            }
        }

        Ok(form)
    }
}

fn saved_paths(saved: &[Option<String>]) -> Vec<String> {
    saved.iter().flatten().cloned().collect()
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ServerError> {
    value.ok_or_else(|| ServerError::Generic(format!("missing field `{field}`")))
}

/// Store the submitted documents and record a pending KYC submission.
pub async fn upload(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Json<Kyc>, ServerError> {
    let form = UploadForm::read(multipart).await?;

    let document_type =
        engine::DocumentType::try_from(required(form.document_type, "document_type")?.trim())?;
    let document_number = required(form.document_number, "document_number")?
        .trim()
        .to_string();
    if document_number.is_empty() {
        return Err(engine::EngineError::InvalidInput(
            "document_number must not be empty".to_string(),
        )
        .into());
    }
    let document = required(form.document_file, "document_file")?;

    // Nothing touches the disk for a second submission.
    if state.engine.has_kyc(user.id).await? {
        return Err(engine::EngineError::ExistingKey("KYC already submitted".to_string()).into());
    }

    let uploads = [
        (document_type.as_str(), Some(document)),
        ("selfie", form.selfie_file),
        ("business", form.business_registration),
    ];
    let store = &state.store;
    let mut saved: Vec<Option<String>> = Vec::with_capacity(uploads.len());
    for (kind, file) in &uploads {
        let Some(file) = file else {
            saved.push(None);
            continue;
        };
        match store
            .save_kyc_file(user.id, kind, file.file_name.as_deref(), &file.bytes)
            .await
        {
            Ok(path) => saved.push(Some(path)),
            Err(err) => {
                store.discard(&saved_paths(&saved)).await;
                return Err(err);
            }
        }
    }
    let written = saved_paths(&saved);

    let mut saved = saved.into_iter();
    let submission = engine::KycSubmission {
        document_type,
        document_number,
        document_file_path: saved.next().flatten().unwrap_or_default(),
        selfie_file_path: saved.next().flatten(),
        business_registration_path: saved.next().flatten(),
        business_address: form.business_address,
    };

    let kyc = match state.engine.submit_kyc(&user.principal(), submission).await {
        Ok(kyc) => kyc,
        Err(err) => {
            store.discard(&written).await;
            return Err(err.into());
        }
    };
    tracing::info!(user = %user.id, kyc = %kyc.id, "kyc submitted");

    Ok(Json(views::kyc(kyc)))
}

pub async fn status(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Kyc>, ServerError> {
    let kyc = state.engine.kyc_status(&user.principal()).await?;
    Ok(Json(views::kyc(kyc)))
}

/// Pending submissions, oldest first. Admin only.
pub async fn queue(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Kyc>>, ServerError> {
    let queue = state.engine.kyc_queue(&user.principal()).await?;
    Ok(Json(queue.into_iter().map(views::kyc).collect()))
}

pub async fn review(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<KycReview>,
) -> Result<Json<Kyc>, ServerError> {
    let kyc = state
        .engine
        .review_kyc(
            &user.principal(),
            id,
            engine::KycReview {
                status: views::engine_kyc_status(payload.status),
                admin_notes: payload.admin_notes,
            },
        )
        .await?;
    tracing::info!(kyc = %kyc.id, status = %kyc.status, reviewer = %user.id, "kyc reviewed");

    Ok(Json(views::kyc(kyc)))
}
