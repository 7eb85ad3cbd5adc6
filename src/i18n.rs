//! Display language: English or Simplified Chinese.
//!
//! Strings are grouped in a [`Text`] table per locale; components read the
//! active table from [`LocaleContext`].

use leptos::prelude::*;

pub const LOCALE_PREFERENCE: &str = "language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh-CN",
        }
    }

    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        if code.to_ascii_lowercase().starts_with("zh") {
            Locale::Zh
        } else {
            Locale::En
        }
    }

    pub fn text(self) -> &'static Text {
        match self {
            Locale::En => &EN,
            Locale::Zh => &ZH,
        }
    }

    /// Localized disease name; labels the UI does not know pass through.
    pub fn disease_name(self, label: &str) -> String {
        let names = &self.text().diseases;
        match label {
            "Healthy" => names.healthy,
            "Mosaic" => names.mosaic,
            "Redrot" => names.redrot,
            "Rust" => names.rust,
            "Yellow" => names.yellow,
            other => return other.to_string(),
        }
        .to_string()
    }
}

#[derive(Clone, Copy)]
pub struct LocaleContext {
    pub locale: ReadSignal<Locale>,
    pub set_locale: WriteSignal<Locale>,
}

impl LocaleContext {
    pub fn text(&self) -> &'static Text {
        self.locale.get().text()
    }
}

pub fn use_locale() -> LocaleContext {
    expect_context::<LocaleContext>()
}

/// Set the `lang` attribute on `<html>` so fonts and line breaking follow the locale.
pub fn apply_locale(locale: Locale) {
    if let Some(html) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = html.set_attribute("lang", locale.code());
    }
}

pub struct DiseaseNames {
    pub healthy: &'static str,
    pub mosaic: &'static str,
    pub redrot: &'static str,
    pub rust: &'static str,
    pub yellow: &'static str,
}

pub struct Text {
    pub app_title: &'static str,
    pub app_tagline: &'static str,
    pub nav_analyze: &'static str,
    pub nav_history: &'static str,
    pub nav_settings: &'static str,

    pub model_loading: &'static str,
    pub model_loading_hint: &'static str,
    pub model_ready: &'static str,
    pub model_failed: &'static str,
    pub model_unloaded: &'static str,
    pub retry: &'static str,

    pub upload_title: &'static str,
    pub upload_subtitle: &'static str,
    pub drop_here: &'static str,
    pub use_camera: &'static str,
    pub upload_image: &'static str,
    pub capture: &'static str,
    pub cancel: &'static str,
    pub starting_camera: &'static str,
    pub supported_formats: &'static str,
    pub tips_title: &'static str,
    pub tips: [&'static str; 4],

    pub analyzing: &'static str,
    pub analyzing_hint: &'static str,
    pub analyze: &'static str,
    pub choose_different: &'static str,

    pub results_title: &'static str,
    pub confidence: &'static str,
    pub description: &'static str,
    pub treatment: &'static str,
    pub all_predictions: &'static str,
    pub analyze_another: &'static str,
    pub save_to_history: &'static str,
    pub saved: &'static str,
    pub inference_time: &'static str,
    pub ms: &'static str,
    pub analysis_failed: &'static str,
    pub try_again: &'static str,

    pub history_title: &'static str,
    pub history_empty: &'static str,
    pub history_empty_hint: &'static str,
    pub history_clear: &'static str,
    pub history_clear_confirm: &'static str,
    pub history_count: &'static str,
    pub history_loading: &'static str,
    pub back_to_list: &'static str,
    pub yes: &'static str,
    pub no: &'static str,

    pub settings_title: &'static str,
    pub language: &'static str,
    pub language_hint: &'static str,
    pub model_section: &'static str,
    pub model_path: &'static str,
    pub load_time: &'static str,
    pub reload_model: &'static str,

    pub disclaimer: &'static str,

    pub diseases: DiseaseNames,
    pub errors: ErrorText,
}

/// One message per error kind.
pub struct ErrorText {
    pub load_timeout: &'static str,
    pub model_load_failure: &'static str,
    pub permission_denied: &'static str,
    pub device_not_found: &'static str,
    pub device_busy: &'static str,
    pub unsupported_format: &'static str,
    pub invalid_image: &'static str,
    pub not_ready: &'static str,
    pub inference_error: &'static str,
    pub unknown_class: &'static str,
    pub config: &'static str,
    pub history: &'static str,
    pub unknown: &'static str,
}

pub static EN: Text = Text {
    app_title: "CaneScan",
    app_tagline: "Sugarcane leaf disease classification",
    nav_analyze: "Analyze",
    nav_history: "History",
    nav_settings: "Settings",

    model_loading: "Loading AI model...",
    model_loading_hint: "The first load may take a moment",
    model_ready: "Model ready",
    model_failed: "Model failed to load",
    model_unloaded: "Model not loaded",
    retry: "Retry",

    upload_title: "Upload Sugarcane Leaf Image",
    upload_subtitle: "Take a photo or upload an existing image",
    drop_here: "Drop a leaf photo here",
    use_camera: "Use Camera",
    upload_image: "Upload Image",
    capture: "Capture Photo",
    cancel: "Cancel",
    starting_camera: "Starting camera...",
    supported_formats: "Supports JPEG, PNG, WebP",
    tips_title: "Tips for best results:",
    tips: [
        "Use good lighting",
        "Capture the entire leaf",
        "Avoid shadows and blur",
        "Focus on diseased areas if visible",
    ],

    analyzing: "Analyzing image...",
    analyzing_hint: "Running AI inference",
    analyze: "Analyze Leaf",
    choose_different: "Choose Different Photo",

    results_title: "Analysis Results",
    confidence: "Confidence:",
    description: "Description",
    treatment: "Treatment",
    all_predictions: "All predictions:",
    analyze_another: "Analyze Another Image",
    save_to_history: "Save to History",
    saved: "Saved",
    inference_time: "Inference time:",
    ms: "ms",
    analysis_failed: "Analysis Failed",
    try_again: "Try Again",

    history_title: "Analysis History",
    history_empty: "No history yet",
    history_empty_hint: "Analyze an image to start your history",
    history_clear: "Clear History",
    history_clear_confirm: "Clear all saved results?",
    history_count: "saved results",
    history_loading: "Loading history...",
    back_to_list: "Back to list",
    yes: "Yes",
    no: "No",

    settings_title: "Settings",
    language: "Language",
    language_hint: "Interface language for labels and disease names.",
    model_section: "Model",
    model_path: "Model file",
    load_time: "Load time",
    reload_model: "Reload Model",

    disclaimer: "Note: this tool provides guidance only. Consult an agricultural expert before treatment.",

    diseases: DiseaseNames {
        healthy: "Healthy",
        mosaic: "Mosaic",
        redrot: "Red Rot",
        rust: "Rust",
        yellow: "Yellow Leaf",
    },
    errors: ErrorText {
        load_timeout: "The model took too long to load.",
        model_load_failure: "The model file could not be loaded.",
        permission_denied: "Camera access was denied. Allow camera access or upload an image instead.",
        device_not_found: "No camera was found. Upload an image instead.",
        device_busy: "The camera is in use by another application.",
        unsupported_format: "This file is not a supported image. Use a JPEG, PNG or WebP photo.",
        invalid_image: "The image could not be read.",
        not_ready: "The model is not loaded yet. Wait for it to finish or retry loading.",
        inference_error: "The model failed while analyzing the image.",
        unknown_class: "The model does not match the known disease classes.",
        config: "The application configuration is invalid.",
        history: "History could not be read or saved.",
        unknown: "Something went wrong.",
    },
};

pub static ZH: Text = Text {
    app_title: "甘蔗病害检测器",
    app_tagline: "AI智能叶片病害分类",
    nav_analyze: "分析",
    nav_history: "历史记录",
    nav_settings: "设置",

    model_loading: "加载AI模型中...",
    model_loading_hint: "首次加载可能需要一点时间",
    model_ready: "模型已就绪",
    model_failed: "模型加载失败",
    model_unloaded: "模型未加载",
    retry: "重试",

    upload_title: "上传甘蔗叶片图像",
    upload_subtitle: "拍照或上传现有图像",
    drop_here: "将叶片照片拖放到此处",
    use_camera: "使用相机",
    upload_image: "上传图像",
    capture: "拍摄照片",
    cancel: "取消",
    starting_camera: "正在启动相机...",
    supported_formats: "支持 JPEG、PNG、WebP",
    tips_title: "最佳拍摄效果提示：",
    tips: [
        "使用良好光线",
        "拍摄整片叶子",
        "避免阴影和模糊",
        "如果可见，聚焦病变区域",
    ],

    analyzing: "分析图像中...",
    analyzing_hint: "正在运行AI推理",
    analyze: "分析叶片",
    choose_different: "选择其他照片",

    results_title: "分析结果",
    confidence: "置信度：",
    description: "描述",
    treatment: "治疗方案",
    all_predictions: "所有预测：",
    analyze_another: "分析其他图像",
    save_to_history: "保存到历史记录",
    saved: "已保存",
    inference_time: "推理时间：",
    ms: "毫秒",
    analysis_failed: "分析失败",
    try_again: "重试",

    history_title: "分析历史记录",
    history_empty: "暂无历史记录",
    history_empty_hint: "开始分析图像以查看您的历史记录",
    history_clear: "清除历史记录",
    history_clear_confirm: "确定要清除所有历史记录吗？",
    history_count: "条记录",
    history_loading: "加载历史记录中...",
    back_to_list: "返回列表",
    yes: "确定",
    no: "取消",

    settings_title: "设置",
    language: "语言",
    language_hint: "界面标签和病害名称使用的语言。",
    model_section: "模型",
    model_path: "模型文件",
    load_time: "加载时间",
    reload_model: "重新加载模型",

    disclaimer: "注意：此工具仅提供指导。请咨询农业专家进行治疗。",

    diseases: DiseaseNames {
        healthy: "健康",
        mosaic: "花叶病",
        redrot: "红腐病",
        rust: "锈病",
        yellow: "黄叶病",
    },
    errors: ErrorText {
        load_timeout: "模型加载超时。",
        model_load_failure: "无法加载模型文件。",
        permission_denied: "相机权限被拒绝。请允许访问相机或改为上传图像。",
        device_not_found: "未找到相机。请改为上传图像。",
        device_busy: "相机正被其他应用程序占用。",
        unsupported_format: "不支持此文件格式。请使用 JPEG、PNG 或 WebP 照片。",
        invalid_image: "无法读取该图像。",
        not_ready: "模型尚未加载。请等待加载完成或重试。",
        inference_error: "模型分析图像时出错。",
        unknown_class: "模型与已知病害类别不匹配。",
        config: "应用配置无效。",
        history: "无法读取或保存历史记录。",
        unknown: "出现错误。",
    },
};
