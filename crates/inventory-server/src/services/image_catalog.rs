//! Картинки серверов: выбор при создании и раздача файлов.

use crate::error::AppError;
use std::path::PathBuf;
use url::Url;

/// Фиксированный набор картинок, из которого выбирается `imageUrl`.
pub const IMAGE_NAMES: [&str; 4] = ["server1.png", "server2.png", "server3.png", "server4.png"];

#[derive(Debug, Clone)]
pub struct ImageCatalog {
    base_url: Url,
    dir: PathBuf,
}

impl ImageCatalog {
    pub fn new(public_base_url: &str, dir: impl Into<PathBuf>) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(public_base_url)?;
        // Без завершающего "/" join заменил бы последний сегмент пути
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            dir: dir.into(),
        })
    }

    /// Полный URL картинки: `{base}/server/image/{name}`.
    pub fn url_for(&self, name: &str) -> Result<String, AppError> {
        self.base_url
            .join(&format!("server/image/{name}"))
            .map(String::from)
            .map_err(|e| AppError::Internal(format!("Ошибка построения URL картинки: {e}")))
    }

    /// Случайная картинка из `IMAGE_NAMES`.
    pub fn random_url(&self) -> Result<String, AppError> {
        self.url_for(pick_image_name()?)
    }

    /// Прочитать файл картинки из директории каталога.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, AppError> {
        validate_file_name(file_name)?;

        match tokio::fs::read(self.dir.join(file_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                format!("Картинка не найдена: {file_name}"),
            )),
            Err(e) => Err(AppError::Internal(format!(
                "Ошибка чтения картинки {file_name}: {e}"
            ))),
        }
    }
}

/// Равновероятный выбор имени картинки.
pub fn pick_image_name() -> Result<&'static str, AppError> {
    let mut buf = [0u8; 4];
    getrandom::fill(&mut buf)
        .map_err(|e| AppError::Internal(format!("Ошибка генератора случайных чисел: {e}")))?;
    let index = u32::from_le_bytes(buf) as usize % IMAGE_NAMES.len();
    Ok(IMAGE_NAMES[index])
}

/// Только имя файла в директории: без разделителей пути и скрытых файлов.
fn validate_file_name(file_name: &str) -> Result<(), AppError> {
    if file_name.is_empty()
        || file_name.starts_with('.')
        || file_name.contains(['/', '\\'])
        || file_name.contains("..")
    {
        return Err(AppError::Validation(format!(
            "Недопустимое имя файла: {file_name}"
        )));
    }
    Ok(())
}
