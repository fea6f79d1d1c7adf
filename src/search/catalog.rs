//! Static inventory used by the catalog providers

use crate::model::Tier;

/// Route data for one destination
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub flight_minutes: u32,
    /// Round-trip fare per person, indexed by tier order
    pub fares: [u64; 3],
}

const fn route_of(flight_minutes: u32, fares: [u64; 3]) -> Route {
    Route {
        flight_minutes,
        fares,
    }
}

/// Used for destinations without a listed route
const DEFAULT_ROUTE: Route = route_of(120, [250_000, 350_000, 550_000]);

const ROUTES: &[(&str, Route)] = &[
    ("Osaka", route_of(120, [250_000, 350_000, 550_000])),
    ("Tokyo", route_of(150, [280_000, 400_000, 600_000])),
    ("Kyoto", route_of(120, [250_000, 350_000, 550_000])),
    ("Bangkok", route_of(330, [300_000, 450_000, 700_000])),
    ("Paris", route_of(720, [800_000, 1_200_000, 2_500_000])),
    ("London", route_of(690, [750_000, 1_100_000, 2_300_000])),
    ("New York", route_of(840, [900_000, 1_400_000, 3_000_000])),
    ("Hawaii", route_of(540, [700_000, 1_000_000, 2_000_000])),
    ("Guam", route_of(240, [400_000, 550_000, 850_000])),
    ("Singapore", route_of(390, [350_000, 500_000, 900_000])),
    ("Hong Kong", route_of(210, [250_000, 380_000, 600_000])),
    ("Jeju", route_of(65, [80_000, 120_000, 200_000])),
    ("Da Nang", route_of(270, [280_000, 400_000, 650_000])),
    ("Bali", route_of(420, [450_000, 650_000, 1_100_000])),
    ("Cebu", route_of(270, [300_000, 420_000, 700_000])),
];

pub fn route(destination: &str) -> Route {
    ROUTES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(destination))
        .map_or(DEFAULT_ROUTE, |(_, route)| *route)
}

pub fn airlines(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Budget => &["티웨이항공", "진에어", "제주항공", "에어서울", "이스타항공"],
        Tier::Standard => &["아시아나항공", "대한항공", "에어아시아", "피치항공"],
        Tier::Premium => &["대한항공", "아시아나항공", "싱가포르항공", "ANA", "JAL"],
    }
}

/// (outbound, inbound) departure windows
pub fn departure_windows(tier: Tier) -> (&'static [&'static str], &'static [&'static str]) {
    match tier {
        Tier::Budget => (
            &["06:00", "06:30", "07:00", "21:00", "22:00"],
            &["08:00", "09:00", "22:00", "23:00"],
        ),
        Tier::Standard => (
            &["09:00", "10:00", "11:00", "14:00", "15:00"],
            &["10:00", "11:00", "15:00", "16:00"],
        ),
        Tier::Premium => (&["10:00", "11:00", "12:00"], &["12:00", "13:00", "14:00"]),
    }
}

// ============================================================================
// Hotels
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Hotel {
    pub name: &'static str,
    pub location: &'static str,
    pub rating: f32,
    pub base_price: u64,
}

const fn hotel(
    name: &'static str,
    location: &'static str,
    rating: f32,
    base_price: u64,
) -> Hotel {
    Hotel {
        name,
        location,
        rating,
        base_price,
    }
}

/// Hotel pools indexed by tier order
type HotelPools = [&'static [Hotel]; 3];

const DEFAULT_HOTELS: HotelPools = [
    &[hotel("시티 게스트하우스", "시내", 4.0, 40_000)],
    &[hotel("시티 호텔", "시내", 4.4, 80_000)],
    &[hotel("그랜드 호텔", "시내", 4.7, 200_000)],
];

const HOTELS: &[(&str, HotelPools)] = &[
    (
        "Osaka",
        [
            &[
                hotel("게스트하우스 난바", "난바", 4.2, 35_000),
                hotel("더 게스트 하우스 우메다", "우메다", 4.0, 38_000),
                hotel("J-호프 오사카 호스텔", "신사이바시", 4.1, 32_000),
            ],
            &[
                hotel("호텔 난바 오리엔탈", "난바", 4.4, 75_000),
                hotel("크로스 호텔 오사카", "신사이바시", 4.5, 85_000),
                hotel("호텔 그레이스리 오사카 난바", "난바", 4.3, 70_000),
            ],
            &[
                hotel("힐튼 오사카", "우메다", 4.7, 180_000),
                hotel("세인트 레지스 오사카", "신사이바시", 4.8, 350_000),
                hotel("리츠칼튼 오사카", "우메다", 4.9, 400_000),
            ],
        ],
    ),
    (
        "Tokyo",
        [
            &[
                hotel("사쿠라 호텔 이케부쿠로", "이케부쿠로", 4.1, 45_000),
                hotel("카오산 월드 아사쿠사", "아사쿠사", 4.0, 40_000),
                hotel("앤호스텔 시부야", "시부야", 4.2, 50_000),
            ],
            &[
                hotel("호텔 선루트 신주쿠", "신주쿠", 4.3, 90_000),
                hotel("시타딘 신주쿠 도쿄", "신주쿠", 4.4, 100_000),
                hotel("레미아 프리미어 긴자", "긴자", 4.5, 110_000),
            ],
            &[
                hotel("파크 하얏트 도쿄", "신주쿠", 4.9, 450_000),
                hotel("만다린 오리엔탈 도쿄", "니혼바시", 4.8, 400_000),
                hotel("아만 도쿄", "오테마치", 4.9, 600_000),
            ],
        ],
    ),
    (
        "Bangkok",
        [
            &[
                hotel("럽디 방콕 실롬", "실롬", 4.3, 25_000),
                hotel("냅파크 호스텔 카오산", "카오산", 4.1, 20_000),
                hotel("호텔 도어즈 방콕", "사톤", 4.0, 28_000),
            ],
            &[
                hotel("아마리 워터게이트", "프랏남", 4.4, 60_000),
                hotel("노보텔 방콕 스쿰빗", "수쿰빗", 4.3, 65_000),
                hotel("웨스틴 그란데 수쿰빗", "수쿰빗", 4.5, 75_000),
            ],
            &[
                hotel("만다린 오리엔탈 방콕", "차오프라야", 4.9, 350_000),
                hotel("페닌슐라 방콕", "차오프라야", 4.8, 300_000),
                hotel("시암 켐핀스키 호텔", "시암", 4.8, 280_000),
            ],
        ],
    ),
    (
        "Jeju",
        [
            &[
                hotel("제주 에코 호스텔", "제주시", 4.0, 35_000),
                hotel("공항 게스트하우스", "제주시", 3.9, 30_000),
                hotel("월정리 해변 게스트하우스", "월정리", 4.2, 40_000),
            ],
            &[
                hotel("그라벨 호텔 제주", "제주시", 4.4, 80_000),
                hotel("메종 글래드 제주", "중문", 4.5, 90_000),
                hotel("호텔 아름드리 제주", "서귀포", 4.3, 75_000),
            ],
            &[
                hotel("롯데호텔 제주", "중문", 4.7, 200_000),
                hotel("신라스테이 제주", "제주시", 4.6, 180_000),
                hotel("하얏트 리젠시 제주", "중문", 4.8, 250_000),
            ],
        ],
    ),
];

pub fn hotels(destination: &str, tier: Tier) -> &'static [Hotel] {
    let pools = HOTELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(destination))
        .map_or(&DEFAULT_HOTELS, |(_, pools)| pools);
    pools[tier_index(tier)]
}

pub fn amenities(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Budget => &["WiFi", "공용 주방", "라운지"],
        Tier::Standard => &["WiFi", "조식", "피트니스", "세탁", "룸서비스"],
        Tier::Premium => &[
            "WiFi",
            "조식",
            "피트니스",
            "스파",
            "수영장",
            "발레파킹",
            "컨시어지",
        ],
    }
}

pub fn distances(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Budget => &["0.8km", "1.0km", "1.2km", "1.5km"],
        Tier::Standard => &["0.3km", "0.5km", "0.7km"],
        Tier::Premium => &["0.1km", "0.2km", "0.3km"],
    }
}

pub fn tier_index(tier: Tier) -> usize {
    match tier {
        Tier::Budget => 0,
        Tier::Standard => 1,
        Tier::Premium => 2,
    }
}
