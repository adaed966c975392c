pub const APPLICATION_NAME: &str = "ocr-lines";
pub const APPLICATION_DIR_NAME: &str = "ocr-lines";

pub const USAGE: &str = "Usage: ocr-lines <image-path>";

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const MODELS_DIR_ENV_VAR: &str = "OCR_LINES_MODELS_DIR";
pub const MODELS_SUBDIR_NAME: &str = "models";

pub const DEFAULT_DETECTION_MODEL_URL: &str =
    "https://huggingface.co/robertknight/ocrs/resolve/main/text-detection-ssfbcj81.rten";
pub const DEFAULT_RECOGNITION_MODEL_URL: &str =
    "https://huggingface.co/robertknight/ocrs/resolve/main/text-rec-checkpoint-s52qdbqt.rten";

pub const DETECTION_MODEL_FILE_NAME: &str = "text-detection.rten";
pub const RECOGNITION_MODEL_FILE_NAME: &str = "text-recognition.rten";

// ocrs does not score its output.
pub const UNSCORED_CONFIDENCE: f32 = 1.0;
