use crate::entities::{PrizeKind, prize_entity as prizes};

/// 支持的界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ar,
    En,
    He,
}

impl Lang {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" => Some(Lang::Ar),
            "en" => Some(Lang::En),
            "he" | "iw" => Some(Lang::He),
            _ => None,
        }
    }

    /// Pick the first supported primary tag from an `Accept-Language` value.
    pub fn negotiate(accept_language: Option<&str>, fallback: Lang) -> Lang {
        accept_language
            .into_iter()
            .flat_map(|v| v.split(','))
            .filter_map(|part| part.split(';').next())
            .filter_map(|tag| tag.split('-').next())
            .find_map(Lang::from_code)
            .unwrap_or(fallback)
    }
}

pub fn already_spun_today(lang: Lang) -> String {
    match lang {
        Lang::Ar => "لقد دورت العجلة اليوم بالفعل. جرب غداً مرة أخرى!",
        Lang::En => "You have already spun the wheel today. Try again tomorrow!",
        Lang::He => "כבר סובבת את הגלגל היום. נסה שוב מחר!",
    }
    .to_string()
}

pub fn no_prizes_available(lang: Lang) -> String {
    match lang {
        Lang::Ar => "لا توجد جوائز متاحة",
        Lang::En => "No prizes are available",
        Lang::He => "אין פרסים זמינים",
    }
    .to_string()
}

pub fn spin_failed(lang: Lang) -> String {
    match lang {
        Lang::Ar => "حدث خطأ في دوران العجلة",
        Lang::En => "Something went wrong while spinning the wheel",
        Lang::He => "אירעה שגיאה בסיבוב הגלגל",
    }
    .to_string()
}

pub fn win_message(lang: Lang, kind: PrizeKind, name: &str) -> String {
    match (kind, lang) {
        (PrizeKind::Discount | PrizeKind::Gift, Lang::Ar) => {
            format!("تهانينا! لقد حصلت على {name}!")
        }
        (PrizeKind::Discount | PrizeKind::Gift, Lang::En) => {
            format!("Congratulations! You won {name}!")
        }
        (PrizeKind::Discount | PrizeKind::Gift, Lang::He) => format!("מזל טוב! זכית ב{name}!"),
        (PrizeKind::FreeShipping, Lang::Ar) => "تهانينا! لقد حصلت على شحن مجاني!".to_string(),
        (PrizeKind::FreeShipping, Lang::En) => {
            "Congratulations! You won free shipping!".to_string()
        }
        (PrizeKind::FreeShipping, Lang::He) => "מזל טוב! זכית במשלוח חינם!".to_string(),
        (PrizeKind::NoPrize, Lang::Ar) => "حاول مرة أخرى!".to_string(),
        (PrizeKind::NoPrize, Lang::En) => "Try again!".to_string(),
        (PrizeKind::NoPrize, Lang::He) => "נסה שוב!".to_string(),
    }
}

/// 扇区上显示的文字
pub fn display_text(lang: Lang, prize: &prizes::Model) -> String {
    match (prize.prize_type, lang) {
        (PrizeKind::Discount, Lang::Ar) => format!("خصم {}%", prize.value),
        (PrizeKind::Discount, Lang::En) => format!("{}% off", prize.value),
        (PrizeKind::Discount, Lang::He) => format!("{}% הנחה", prize.value),
        (PrizeKind::FreeShipping, Lang::Ar) => "شحن مجاني".to_string(),
        (PrizeKind::FreeShipping, Lang::En) => "Free shipping".to_string(),
        (PrizeKind::FreeShipping, Lang::He) => "משלוח חינם".to_string(),
        (PrizeKind::Gift, _) => prize.name.clone(),
        (PrizeKind::NoPrize, Lang::Ar) => "حاول مرة أخرى".to_string(),
        (PrizeKind::NoPrize, Lang::En) => "Try again".to_string(),
        (PrizeKind::NoPrize, Lang::He) => "נסה שוב".to_string(),
    }
}
