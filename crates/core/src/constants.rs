//! Constants and the shipped data set used by [`crate::CoreConfig::builtin`].
//!
//! The shipped tables mirror the dashboard's demo data: five provinces, their cities, the
//! districts of the cities that have them, and the eight body diagram regions.

use std::time::Duration;

/// Fixed delay of the mock submission collaborator.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

/// Earliest accepted birth date (`YYYY-MM-DD`).
pub const EARLIEST_BIRTH_DATE: &str = "1900-01-01";

/// Largest accepted questionnaire attachment.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// File extensions accepted for questionnaire attachments (lowercase, without the dot).
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Gender options offered by the profile form.
pub const GENDERS: &[&str] = &["male", "female", "other"];

pub const PROVINCES: &[&str] = &["北京市", "上海市", "广东省", "江苏省", "浙江省"];

pub const CITIES: &[(&str, &[&str])] = &[
    ("北京市", &["朝阳区", "海淀区", "东城区", "西城区"]),
    ("上海市", &["黄浦区", "静安区", "浦东新区", "徐汇区"]),
    ("广东省", &["广州市", "深圳市", "珠海市", "佛山市"]),
    ("江苏省", &["南京市", "苏州市", "无锡市", "常州市"]),
    ("浙江省", &["杭州市", "宁波市", "温州市", "绍兴市"]),
];

pub const DISTRICTS: &[(&str, &[&str])] = &[
    ("朝阳区", &["三里屯", "望京", "CBD", "奥运村"]),
    ("海淀区", &["中关村", "五道口", "清华大学", "北京大学"]),
    ("广州市", &["天河区", "越秀区", "海珠区", "白云区"]),
    ("深圳市", &["南山区", "福田区", "宝安区", "龙岗区"]),
    ("杭州市", &["西湖区", "上城区", "江干区", "下城区"]),
];

/// A shipped body region: id, display name, `[left, top, width, height]`, candidate tags.
pub type RegionRow = (&'static str, &'static str, [f64; 4], &'static [&'static str]);

const LIMB_TAGS: &[&str] = &["疼痛", "肿胀", "麻木", "关节疼痛"];

pub const BODY_REGIONS: &[RegionRow] = &[
    ("head", "头部", [45.0, 5.0, 10.0, 10.0], &["头痛", "头晕", "偏头痛", "头部肿胀"]),
    ("chest", "胸部", [45.0, 25.0, 20.0, 10.0], &["胸痛", "呼吸困难", "心悸", "胸闷"]),
    ("abdomen", "腹部", [45.0, 37.0, 20.0, 10.0], &["腹痛", "腹泻", "便秘", "胃灼热"]),
    ("leftArm", "左臂", [30.0, 25.0, 10.0, 15.0], LIMB_TAGS),
    ("rightArm", "右臂", [60.0, 25.0, 10.0, 15.0], LIMB_TAGS),
    ("leftLeg", "左腿", [40.0, 50.0, 7.0, 20.0], LIMB_TAGS),
    ("rightLeg", "右腿", [53.0, 50.0, 7.0, 20.0], LIMB_TAGS),
    ("back", "背部", [75.0, 25.0, 10.0, 20.0], &["背痛", "脊椎疼痛", "肌肉紧张", "姿势不良疼痛"]),
];

/// Mock wearable readings shown on the dashboard.
pub const HEART_RATE_SERIES: &[(&str, f64)] = &[
    ("00:00", 68.0),
    ("03:00", 65.0),
    ("06:00", 72.0),
    ("09:00", 85.0),
    ("12:00", 90.0),
    ("15:00", 87.0),
    ("18:00", 95.0),
    ("21:00", 78.0),
];

pub const BLOOD_OXYGEN_SERIES: &[(&str, f64)] = &[
    ("00:00", 97.0),
    ("03:00", 96.0),
    ("06:00", 97.0),
    ("09:00", 98.0),
    ("12:00", 99.0),
    ("15:00", 98.0),
    ("18:00", 97.0),
    ("21:00", 98.0),
];

/// `(day, deep, light, awake)` hours.
pub const SLEEP_WEEK: &[(&str, f64, f64, f64)] = &[
    ("周一", 2.5, 4.5, 0.5),
    ("周二", 3.0, 4.0, 0.2),
    ("周三", 2.0, 3.5, 1.0),
    ("周四", 2.8, 4.2, 0.3),
    ("周五", 3.2, 3.8, 0.4),
    ("周六", 3.5, 5.0, 0.2),
    ("周日", 3.0, 4.5, 0.3),
];

pub const STEP_WEEK: &[(&str, u32)] = &[
    ("周一", 8245),
    ("周二", 9345),
    ("周三", 7654),
    ("周四", 10234),
    ("周五", 8543),
    ("周六", 12345),
    ("周日", 9876),
];

/// `(name, relation, id number, phone, last checkup)` of the seeded family roster.
pub const FAMILY_SEED: &[(&str, &str, &str, &str, &str)] = &[
    ("王晓红", "母亲", "310************123", "138********", "2024-04-15"),
    ("王大明", "父亲", "310************456", "139********", "2024-03-22"),
];

/// `(name, specialty, hospital, rating, years of practice, accepting patients)`.
pub const DOCTOR_SEED: &[(&str, &str, &str, f64, u32, bool)] = &[
    ("张教授", "中医内科", "上海中医药大学附属医院", 4.9, 30, true),
    ("李医师", "针灸推拿", "北京中医医院", 4.7, 15, true),
    ("王主任", "中医妇科", "广州中医药大学第一附属医院", 4.8, 25, false),
    ("陈医师", "中医儿科", "成都中医药大学附属医院", 4.6, 18, true),
    ("郑教授", "中医肿瘤科", "上海中医药大学附属岳阳医院", 4.9, 28, true),
    ("吴主任", "中医骨伤科", "南京中医药大学附属医院", 4.8, 22, true),
];

/// A shipped shop product.
pub struct ProductRow {
    pub name: &'static str,
    pub category: &'static str,
    /// Price in yuan.
    pub price: u32,
    pub original_price: Option<u32>,
    pub description: &'static str,
    pub rating: f64,
    pub sales: u32,
    pub tags: &'static [&'static str],
}

pub const PRODUCT_SEED: &[ProductRow] = &[
    ProductRow {
        name: "经典养生茶礼盒",
        category: "草本茶",
        price: 128,
        original_price: Some(168),
        description: "精选5种中草药材，改善睡眠，调理肠胃",
        rating: 4.8,
        sales: 2546,
        tags: &["热销", "礼盒"],
    },
    ProductRow {
        name: "中医艾灸仪",
        category: "中医器械",
        price: 298,
        original_price: None,
        description: "智能温控，多功能艾灸盒，改善亚健康",
        rating: 4.7,
        sales: 1862,
        tags: &["推荐"],
    },
    ProductRow {
        name: "足部按摩器",
        category: "保健器械",
        price: 399,
        original_price: Some(499),
        description: "仿真人手法，穴位精准按摩，缓解疲劳",
        rating: 4.9,
        sales: 3245,
        tags: &["热销", "限时折扣"],
    },
    ProductRow {
        name: "滋补养生膏",
        category: "滋补品",
        price: 198,
        original_price: None,
        description: "纯天然草本配方，增强免疫力，适合长期服用",
        rating: 4.6,
        sales: 1356,
        tags: &[],
    },
    ProductRow {
        name: "颈椎按摩仪",
        category: "保健器械",
        price: 259,
        original_price: Some(329),
        description: "多功能颈部按摩，缓解颈椎不适，改善血液循环",
        rating: 4.5,
        sales: 2189,
        tags: &["限时折扣"],
    },
    ProductRow {
        name: "手工刮痧板",
        category: "中医器械",
        price: 68,
        original_price: None,
        description: "天然牛角材质，传统工艺打造，排毒养颜",
        rating: 4.8,
        sales: 3587,
        tags: &["手工制作"],
    },
];
