//! Places to visit per destination

#[derive(Debug, Clone, Copy)]
pub struct Spots {
    pub sightseeing: &'static [&'static str],
    pub food: &'static [&'static str],
    pub shopping: &'static [&'static str],
    pub culture: &'static [&'static str],
    pub nature: &'static [&'static str],
}

const DEFAULT_SPOTS: Spots = Spots {
    sightseeing: &["구시가지", "전망대", "중앙 광장", "랜드마크 투어"],
    food: &["현지 시장 맛집", "로컬 레스토랑", "푸드 스트리트"],
    shopping: &["중심가 쇼핑거리", "현지 기념품 시장", "대형 쇼핑몰"],
    culture: &["시립 박물관", "미술관", "전통 공연장"],
    nature: &["시립 공원", "해변 산책로", "근교 전망 언덕"],
};

const SPOTS: &[(&str, Spots)] = &[
    (
        "Osaka",
        Spots {
            sightseeing: &[
                "오사카성",
                "도톤보리",
                "우메다 스카이빌딩",
                "신세카이",
                "유니버설 스튜디오 재팬",
            ],
            food: &[
                "구로몬 시장",
                "도톤보리 타코야키 골목",
                "쓰루하시 야키니쿠 거리",
                "난바 오코노미야키",
            ],
            shopping: &["신사이바시 쇼핑거리", "아메리카무라", "우메다 한큐 백화점"],
            culture: &["오사카 역사박물관", "시텐노지", "국립 분라쿠 극장"],
            nature: &["오사카성 공원", "미노오 폭포", "나카노시마 공원"],
        },
    ),
    (
        "Tokyo",
        Spots {
            sightseeing: &[
                "센소지",
                "도쿄 스카이트리",
                "시부야 스크램블 교차로",
                "도쿄타워",
                "메이지 신궁",
            ],
            food: &["쓰키지 장외시장", "신주쿠 오모이데요코초", "긴자 스시 거리", "라멘 스트리트"],
            shopping: &["긴자", "하라주쿠 다케시타 거리", "아키하바라"],
            culture: &["도쿄 국립박물관", "모리 미술관", "가부키자"],
            nature: &["우에노 공원", "신주쿠 교엔", "오다이바 해변공원"],
        },
    ),
    (
        "Bangkok",
        Spots {
            sightseeing: &["왕궁", "왓 아룬", "왓 포", "짜오프라야 강 크루즈"],
            food: &["야오와랏 차이나타운", "쩟페어 야시장", "카오산 로드 노점"],
            shopping: &["짜뚜짝 주말시장", "시암 파라곤", "아이콘시암"],
            culture: &["방콕 국립박물관", "짐 톰슨 하우스", "무에타이 경기장"],
            nature: &["룸피니 공원", "방끄라짜오 자전거 투어", "벤자키티 공원"],
        },
    ),
    (
        "Jeju",
        Spots {
            sightseeing: &["성산일출봉", "우도", "천지연 폭포", "섭지코지"],
            food: &["동문재래시장", "흑돼지 거리", "모슬포 방어 맛집"],
            shopping: &["바오젠 거리", "제주 면세점", "서귀포 매일올레시장"],
            culture: &["제주민속촌", "제주 4·3 평화공원", "본태박물관"],
            nature: &["한라산 영실코스", "사려니숲길", "협재 해수욕장"],
        },
    ),
];

pub fn for_destination(destination: &str) -> Spots {
    SPOTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(destination))
        .map_or(DEFAULT_SPOTS, |(_, spots)| *spots)
}

/// Deterministic rotation through a pool
pub fn pick(pool: &'static [&'static str], n: usize) -> &'static str {
    if pool.is_empty() {
        return "";
    }
    pool[n % pool.len()]
}
