use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const APP_TITLE: &str = "general.app_title";
    pub const APP_CAPTION: &str = "general.app_caption";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_PRESET: &str = "main_menu.preset";
    pub const MAIN_MENU_INGREDIENTS: &str = "main_menu.ingredients";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_REPORT: &str = "main_menu.report";
    pub const MAIN_MENU_EXPORT: &str = "main_menu.export";
    pub const MAIN_MENU_NOTES: &str = "main_menu.notes";
    pub const MAIN_MENU_LANGUAGE: &str = "main_menu.language";
    pub const MAIN_MENU_SAVE: &str = "main_menu.save";
    pub const MAIN_MENU_SAVE_RECIPE: &str = "main_menu.save_recipe";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const PRESET_HEADING: &str = "preset.heading";
    pub const PRESET_PROMPT: &str = "preset.prompt";
    pub const PRESET_LOADED: &str = "preset.loaded";

    pub const INGREDIENTS_HEADING: &str = "ingredients.heading";
    pub const INGREDIENTS_NOTE_QS: &str = "ingredients.note_qs";
    pub const INGREDIENTS_OPTIONS: &str = "ingredients.options";
    pub const PROMPT_ROW_INDEX: &str = "prompt.row_index";
    pub const PROMPT_NAME: &str = "prompt.name";
    pub const PROMPT_PERCENT: &str = "prompt.percent";
    pub const PROMPT_ACTIVE_FRAC: &str = "prompt.active_frac";
    pub const PROMPT_COST_PER_KG: &str = "prompt.cost_per_kg";
    pub const PROMPT_KEEP_HINT: &str = "prompt.keep_hint";
    pub const ROW_ADDED: &str = "ingredients.row_added";
    pub const ROW_REMOVED: &str = "ingredients.row_removed";
    pub const ROW_NOT_FOUND: &str = "ingredients.row_not_found";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const PROMPT_DENSITY: &str = "prompt.density";
    pub const PROMPT_BATCH_UNIT: &str = "prompt.batch_unit";
    pub const PROMPT_BATCH_SIZE: &str = "prompt.batch_size";
    pub const PROMPT_BOTTLE_SIZE: &str = "prompt.bottle_size";
    pub const PROMPT_BOTTLE_LOSS: &str = "prompt.bottle_loss";
    pub const SETTINGS_COST_NOTE: &str = "settings.cost_note";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const REPORT_BATCH_HEADING: &str = "report.batch_heading";
    pub const REPORT_PACKAGING_HEADING: &str = "report.packaging_heading";
    pub const REPORT_TOTAL: &str = "report.total";
    pub const REPORT_ACTIVE_MATTER: &str = "report.active_matter";
    pub const REPORT_BATCH_MASS: &str = "report.batch_mass";
    pub const REPORT_TOTAL_COST: &str = "report.total_cost";
    pub const REPORT_USABLE_VOLUME: &str = "report.usable_volume";
    pub const REPORT_WARNING_TOTAL: &str = "report.warning_total";
    pub const REPORT_WARNING_QS_CLAMPED: &str = "report.warning_qs_clamped";

    pub const EXPORT_PROMPT_PATH: &str = "export.prompt_path";
    pub const EXPORT_DONE: &str = "export.done";
    pub const RECIPE_PROMPT_PATH: &str = "recipe.prompt_path";
    pub const RECIPE_SAVED: &str = "recipe.saved";

    pub const NOTES_HEADING: &str = "notes.heading";
    pub const NOTES_BODY: &str = "notes.body";

    pub const LANGUAGE_PROMPT: &str = "language.prompt";
    pub const LANGUAGE_SET: &str = "language.set";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    My,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("my") || c.starts_with("bur") {
            Language::My
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::My => "my",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(en/my)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 내장 번들 → 영어 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        let built_in = match self.lang {
            Language::My => my(key).or_else(|| en(key)),
            Language::En => en(key),
        };
        built_in.unwrap_or(key)
    }

    /// `{name}` 자리표시자를 채운 번역을 돌려준다.
    pub fn tf(&self, key: &str, args: &[(&str, String)]) -> String {
        args.iter()
            .fold(self.t(key).to_string(), |acc, (name, value)| {
                acc.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "burmese" => Some("my".into()),
        other if other.starts_with("my") => Some("my".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "my" => Some("my".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵 또는 섹션.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    lang.split_once(['-', '_'])
        .and_then(|(base, _)| try_load(base))
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        APP_TITLE => "Dishwashing Liquid Formulation Calculator",
        APP_CAPTION => "% adjust, batch sizing, Active Matter (AM%), cost & CSV export",
        APP_EXIT => "Exiting.",
        MAIN_MENU_TITLE => "\n=== Formulation Calculator ===",
        MAIN_MENU_PRESET => "1) Load preset",
        MAIN_MENU_INGREDIENTS => "2) Ingredients (% and active fractions)",
        MAIN_MENU_SETTINGS => "3) Global settings / bottle",
        MAIN_MENU_REPORT => "4) Batch weights, cost & packaging",
        MAIN_MENU_EXPORT => "5) Export CSV",
        MAIN_MENU_NOTES => "6) Practical notes",
        MAIN_MENU_LANGUAGE => "7) Language",
        MAIN_MENU_SAVE => "8) Save settings",
        MAIN_MENU_SAVE_RECIPE => "9) Save ingredients as recipe (TOML)",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        PROMPT_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please select again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PRESET_HEADING => "\n-- Preset / Load a style --",
        PRESET_PROMPT => "Choose preset style: ",
        PRESET_LOADED => "Preset loaded:",
        INGREDIENTS_HEADING => "\n-- 1) Ingredients: % and Active Fractions --",
        INGREDIENTS_NOTE_QS => {
            "Note: any row named Water is set automatically (QS) so the total reaches 100%."
        }
        INGREDIENTS_OPTIONS => "e) edit row  a) add row  d) delete row  (Enter = back)",
        PROMPT_ROW_INDEX => "Row number: ",
        PROMPT_NAME => "Ingredient (raw material): ",
        PROMPT_PERCENT => "% (w/w): ",
        PROMPT_ACTIVE_FRAC => "Active fraction (0-1), e.g. SLES 70% -> 0.70: ",
        PROMPT_COST_PER_KG => "Cost per kg (optional): ",
        PROMPT_KEEP_HINT => "(Enter keeps the current value; non-numeric input counts as 0)",
        ROW_ADDED => "Row added.",
        ROW_REMOVED => "Row removed.",
        ROW_NOT_FOUND => "No such row.",
        SETTINGS_HEADING => "\n-- 2) Global settings / Bottle --",
        PROMPT_DENSITY => "Final product density (kg/L, 0.8-1.2): ",
        PROMPT_BATCH_UNIT => "Batch input unit (1=Liters final volume, 2=Kilograms final mass): ",
        PROMPT_BATCH_SIZE => "Batch size (>= 0.1): ",
        PROMPT_BOTTLE_SIZE => "Bottle size (mL, >= 50): ",
        PROMPT_BOTTLE_LOSS => "Production loss allowance % (>= 0): ",
        SETTINGS_COST_NOTE => "Cost per kg is entered in the ingredients table.",
        SETTINGS_SAVED => "Settings saved to",
        REPORT_BATCH_HEADING => "3) Batch Weights & Cost",
        REPORT_PACKAGING_HEADING => "4) Packaging Estimate",
        REPORT_TOTAL => "Total",
        REPORT_ACTIVE_MATTER => "Active Matter (AM%)",
        REPORT_BATCH_MASS => "Batch mass",
        REPORT_TOTAL_COST => "Estimated total cost",
        REPORT_USABLE_VOLUME => {
            "Usable volume ≈ {liters} L after losses → {bottles} bottles of {bottle_ml} mL"
        }
        REPORT_WARNING_TOTAL => {
            "Total = {total}% (should be 100%). Adjust numbers or ensure a Water row exists for auto-QS."
        }
        REPORT_WARNING_QS_CLAMPED => {
            "Total = {total}% (should be 100%). Non-water ingredients already exceed 100%, so the Water (QS) row was clamped to 0%."
        }
        EXPORT_PROMPT_PATH => "CSV file name (Enter = {default}): ",
        EXPORT_DONE => "CSV written:",
        RECIPE_PROMPT_PATH => "Recipe file name (Enter = {default}): ",
        RECIPE_SAVED => "Recipe written:",
        NOTES_HEADING => "\n-- Practical Notes --",
        NOTES_BODY => {
            "Formulation tips:
- Check the supplier COA for the active % of SLES/SLS/CAPB/APG (e.g. SLES 70%).
- Raise viscosity with NaCl a little at a time (start at 0.3-0.5%, add gradually).
- Target pH ~ 6.0-7.0, adjust gently with citric acid.
- Dose preservative at the supplier usage rate (typically 0.2-0.5%).
- Trial fragrance within 0.2-0.7%; too much can cause cloudiness.
- Run a 1-2 L pilot batch before scaling up to production."
        }
        LANGUAGE_PROMPT => "Language (en / my): ",
        LANGUAGE_SET => "Language set to",
        _ => return None,
    };
    Some(s)
}

fn my(key: &str) -> Option<&'static str> {
    use keys::*;
    let s = match key {
        PRESET_PROMPT => "Choose preset style (ရွေးချယ်ရန်): ",
        INGREDIENTS_NOTE_QS => {
            "မှတ်ချက်: Water ကို 100% အဖြစ် ပါစေဖို့ အသားတင် (QS) လုပ်ပါမယ်။ % တွေကို ပြင်ပြီးသားဆိုရင် Water ကို app က အလိုအလျှောက်ပြန်ညှိပေးနိုင်ပါတယ်။"
        }
        SETTINGS_COST_NOTE => "Cost per kg ကို Ingredients table ထဲကနေ ထည့်နိုင်သည်။",
        NOTES_HEADING => "\n-- Practical Notes (မြန်မာလို) --",
        NOTES_BODY => {
            "Formulation Tips:
- SLES/SLS/CAPB/APG Active % မတိတိကျကျသိလျှင် Supplier COA ကိုစစ်ပါ (e.g., SLES 70%).
- Viscosity ကို NaCl ဖြင့်အနည်းငယ်ချင်း တိုးပါ—တစ်ခါတည်း မထည့်ပါနှင့် (0.3–0.5% စတင်, မျက်နှာပြင်နှေးလာရင် တဖြည်းဖြည်း တိုး).
- pH target ~ 6.0–7.0 (Citric Acid ဖြင့်ချိုသာညှိ).
- Preservative ကို Supplier usage rate အတိုင်း (ပုံမှန် 0.2–0.5%) ထားပါ.
- Fragrance 0.2–0.7% အတွင်း စမ်းသပ်ပါ—အလွန်များလျှင် cloudiness ဖြစ်နိုင်.
- အရင်ဆုံး pilot 1–2 L စမ်းပြီးမှ production တိုးပါ။"
        }
        _ => return None,
    };
    Some(s)
}
