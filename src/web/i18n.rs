//! Page localization: zh-TW (default) and en, chosen by the `zoo_culture` cookie

use axum::http::{header, HeaderMap};

pub const CULTURE_COOKIE: &str = "zoo_culture";
/// One year
pub const CULTURE_COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    ZhTw,
    En,
}

impl Lang {
    /// Accepts plain culture names ("en", "en-US", "zh-TW") and the
    /// `c=en|uic=en` cookie form
    pub fn parse(culture: &str) -> Self {
        let culture = culture
            .split('|')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_start_matches("c=");
        if culture.to_ascii_lowercase().starts_with("en") {
            Lang::En
        } else {
            Lang::ZhTw
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CULTURE_COOKIE)
            .map(|(_, value)| Lang::parse(&urlencoding::decode(value).unwrap_or_default()))
            .unwrap_or_default()
    }

    pub fn culture(self) -> &'static str {
        match self {
            Lang::ZhTw => "zh-TW",
            Lang::En => "en",
        }
    }

    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Lang::ZhTw => zh,
            Lang::En => en,
        }
    }

    pub fn texts(self) -> &'static Texts {
        match self {
            Lang::ZhTw => &ZH_TW,
            Lang::En => &EN,
        }
    }
}

/// Interface strings for one language
#[derive(Debug)]
pub struct Texts {
    pub site_name: &'static str,
    pub switch_language: &'static str,
    pub other_culture: &'static str,
    pub nav_home: &'static str,
    pub nav_animals: &'static str,
    pub nav_search: &'static str,
    pub nav_map: &'static str,
    pub nav_routes: &'static str,
    pub nav_quiz: &'static str,
    pub nav_favorites: &'static str,
    pub nav_about: &'static str,
    pub home_intro: &'static str,
    pub featured_heading: &'static str,
    pub view_all_animals: &'static str,
    pub animals_heading: &'static str,
    pub animals_total: &'static str,
    pub search_placeholder: &'static str,
    pub search_button: &'static str,
    pub filter_any: &'static str,
    pub filter_class: &'static str,
    pub filter_habitat: &'static str,
    pub filter_diet: &'static str,
    pub filter_activity: &'static str,
    pub no_results: &'static str,
    pub score_label: &'static str,
    pub size_label: &'static str,
    pub appearance_label: &'static str,
    pub behavior_label: &'static str,
    pub conservation_label: &'static str,
    pub zone_label: &'static str,
    pub fun_facts_heading: &'static str,
    pub related_heading: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub play_sound: &'static str,
    pub add_favorite: &'static str,
    pub map_heading: &'static str,
    pub animals_label: &'static str,
    pub zones_label: &'static str,
    pub minutes_label: &'static str,
    pub routes_heading: &'static str,
    pub custom_route_heading: &'static str,
    pub custom_route_hint: &'static str,
    pub plan_button: &'static str,
    pub quiz_heading: &'static str,
    pub quiz_total_label: &'static str,
    pub quiz_random: &'static str,
    pub favorites_heading: &'static str,
    pub favorites_empty: &'static str,
    pub history_heading: &'static str,
    pub about_heading: &'static str,
    pub about_body: &'static str,
    pub not_found_heading: &'static str,
    pub not_found_body: &'static str,
    pub error_heading: &'static str,
    pub error_body: &'static str,
    pub back_home: &'static str,
}

pub static ZH_TW: Texts = Texts {
    site_name: "動物園導覽",
    switch_language: "English",
    other_culture: "en",
    nav_home: "首頁",
    nav_animals: "動物圖鑑",
    nav_search: "搜尋",
    nav_map: "園區地圖",
    nav_routes: "參觀路線",
    nav_quiz: "知識測驗",
    nav_favorites: "我的收藏",
    nav_about: "關於",
    home_intro: "認識園區裡的每一位動物朋友，規劃屬於你的參觀路線。",
    featured_heading: "保育明星",
    view_all_animals: "查看全部動物",
    animals_heading: "動物圖鑑",
    animals_total: "隻動物",
    search_placeholder: "輸入動物名稱或關鍵字",
    search_button: "搜尋",
    filter_any: "不限",
    filter_class: "分類",
    filter_habitat: "棲息地",
    filter_diet: "食性",
    filter_activity: "活動時間",
    no_results: "找不到符合條件的動物",
    score_label: "相關度",
    size_label: "體型",
    appearance_label: "外觀",
    behavior_label: "習性",
    conservation_label: "保育等級",
    zone_label: "所在區域",
    fun_facts_heading: "你知道嗎？",
    related_heading: "相關動物",
    previous: "上一隻",
    next: "下一隻",
    play_sound: "播放叫聲",
    add_favorite: "加入收藏",
    map_heading: "園區地圖",
    animals_label: "隻動物",
    zones_label: "個區域",
    minutes_label: "分鐘",
    routes_heading: "推薦路線",
    custom_route_heading: "自訂路線",
    custom_route_hint: "勾選想看的動物，我們會幫你排出參觀順序。",
    plan_button: "規劃路線",
    quiz_heading: "知識測驗",
    quiz_total_label: "道題目",
    quiz_random: "隨機挑戰",
    favorites_heading: "我的收藏",
    favorites_empty: "還沒有收藏任何動物",
    history_heading: "瀏覽紀錄",
    about_heading: "關於本站",
    about_body: "本站提供園區動物介紹、地圖與參觀路線規劃。收藏與瀏覽紀錄僅儲存在你的瀏覽器中。",
    not_found_heading: "找不到頁面",
    not_found_body: "你要找的頁面不存在，可能已被移除。",
    error_heading: "發生錯誤",
    error_body: "目前無法載入資料，請稍後再試。",
    back_home: "回到首頁",
};

pub static EN: Texts = Texts {
    site_name: "Zoo Guide",
    switch_language: "中文",
    other_culture: "zh-TW",
    nav_home: "Home",
    nav_animals: "Animals",
    nav_search: "Search",
    nav_map: "Map",
    nav_routes: "Routes",
    nav_quiz: "Quiz",
    nav_favorites: "Favorites",
    nav_about: "About",
    home_intro: "Meet every animal in the park and plan a visit of your own.",
    featured_heading: "Conservation stars",
    view_all_animals: "See all animals",
    animals_heading: "Animal catalog",
    animals_total: "animals",
    search_placeholder: "Animal name or keyword",
    search_button: "Search",
    filter_any: "Any",
    filter_class: "Class",
    filter_habitat: "Habitat",
    filter_diet: "Diet",
    filter_activity: "Activity",
    no_results: "No animals match your search",
    score_label: "Relevance",
    size_label: "Size",
    appearance_label: "Appearance",
    behavior_label: "Behavior",
    conservation_label: "Conservation status",
    zone_label: "Zone",
    fun_facts_heading: "Did you know?",
    related_heading: "Related animals",
    previous: "Previous",
    next: "Next",
    play_sound: "Play sound",
    add_favorite: "Add to favorites",
    map_heading: "Park map",
    animals_label: "animals",
    zones_label: "zones",
    minutes_label: "min",
    routes_heading: "Suggested routes",
    custom_route_heading: "Plan your own route",
    custom_route_hint: "Tick the animals you want to see and we will order the visit for you.",
    plan_button: "Plan route",
    quiz_heading: "Quiz",
    quiz_total_label: "questions",
    quiz_random: "Random challenge",
    favorites_heading: "My favorites",
    favorites_empty: "You have not saved any animals yet",
    history_heading: "Recently viewed",
    about_heading: "About",
    about_body: "Animal profiles, a park map and route planning. Favorites and history stay in your browser.",
    not_found_heading: "Page not found",
    not_found_body: "The page you are looking for does not exist.",
    error_heading: "Something went wrong",
    error_body: "Zoo data could not be loaded. Please try again later.",
    back_home: "Back to home",
};
