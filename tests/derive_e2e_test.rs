// ==========================================
// 批次派生端到端测试
// ==========================================
// 测试范围: 规则管理 → 窗口解析 → 关联聚合 → 派生 → 整体替换
// ==========================================

mod helpers;

use helpers::test_data_builder::*;
use helpers::test_env::TestEnv;
use ticket_report::domain::types::{BatchOutcome, WindowScope};
use ticket_report::engine::UNCLASSIFIED_BUSINESS_UNIT;
use ticket_report::logging;

// ==========================================
// 场景1: 完整批次派生(基准场景)
// ==========================================

#[tokio::test]
async fn test_full_batch_derivation() {
    logging::init_test();
    let env = TestEnv::new();

    // 准备规则与窗口
    env.rule_api
        .create_rule(business_unit_rule("SB", "SB", 0))
        .expect("create bu rule");
    env.rule_api
        .create_rule(status_rule("En curso", "Abierta"))
        .expect("create status rule");
    env.window_api
        .save_window(WindowScope::Monthly, window_around_today(7, 7))
        .expect("save window");

    // 1001 被两条关联引用为子侧
    env.link_repo
        .replace_all(&[link("2001", "1001"), link("2002", "1001")])
        .expect("seed links");

    let rows = vec![
        RawRowBuilder::new("1001").build(),
        RawRowBuilder::new("1002")
            .application("Portal RRHH")
            .raw_status("Cerrado")
            .build(),
        RawRowBuilder::new("1003")
            .created_time(&wire_timestamp_days_from_today(-30))
            .build(),
    ];

    let response = env
        .derive_api
        .derive(rows, WindowScope::Monthly)
        .await
        .expect("derive failed");

    assert_eq!(response.outcome, BatchOutcome::Success);
    assert_eq!(response.imported, 3);
    assert_eq!(response.failed, 0);
    assert!(!response.batch_id.is_empty());

    let records = env
        .ticket_api
        .list_records(WindowScope::Monthly)
        .expect("list records");
    assert_eq!(records.len(), 3);

    let r1001 = records.iter().find(|r| r.request_id == "1001").unwrap();
    assert_eq!(r1001.business_unit, "SB");
    assert_eq!(r1001.canonical_status, "Abierta");
    assert!(r1001.in_date_range);
    assert_eq!(r1001.linked_count, 2);
    assert_eq!(r1001.import_batch_id, response.batch_id);

    // 无规则命中: 业务单元哨兵值, 状态原文透传
    let r1002 = records.iter().find(|r| r.request_id == "1002").unwrap();
    assert_eq!(r1002.business_unit, UNCLASSIFIED_BUSINESS_UNIT);
    assert_eq!(r1002.canonical_status, "Cerrado");
    assert_eq!(r1002.linked_count, 0);

    // 窗口外 30 天: 正常派生, 仅 in_date_range = false
    let r1003 = records.iter().find(|r| r.request_id == "1003").unwrap();
    assert!(!r1003.in_date_range);
}

// ==========================================
// 场景2: 行级错误与部分成功
// ==========================================

#[tokio::test]
async fn test_partial_success_collects_row_errors() {
    let env = TestEnv::new();
    env.window_api
        .save_window(WindowScope::Monthly, window_around_today(7, 7))
        .expect("save window");

    let rows = vec![
        RawRowBuilder::new("1001").build(),
        RawRowBuilder::new("1002")
            .created_time("fecha inválida")
            .build(),
    ];

    let response = env
        .derive_api
        .derive(rows, WindowScope::Monthly)
        .await
        .expect("derive failed");

    assert_eq!(response.outcome, BatchOutcome::PartialSuccess);
    assert_eq!(response.imported, 1);
    assert_eq!(response.failed, 1);
    assert_eq!(response.row_errors.len(), 1);
    assert_eq!(response.row_errors[0].row, 1);
    assert_eq!(response.row_errors[0].field, "created_time");

    // 坏行被剔除, 好行已落库
    let records = env
        .ticket_api
        .list_records(WindowScope::Monthly)
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_id, "1001");
}

// ==========================================
// 场景3: 全失败批次不得破坏旧集合
// ==========================================

#[tokio::test]
async fn test_failed_batch_preserves_previous_records() {
    let env = TestEnv::new();

    let good = vec![RawRowBuilder::new("1001").build()];
    let first = env
        .derive_api
        .derive(good, WindowScope::Monthly)
        .await
        .expect("first derive");
    assert_eq!(first.outcome, BatchOutcome::Success);

    // 全部行缺工单号 → 批次 FAILED
    let garbage = vec![
        RawRowBuilder::new("   ").build(),
        RawRowBuilder::new("").build(),
    ];
    let second = env
        .derive_api
        .derive(garbage, WindowScope::Monthly)
        .await
        .expect("second derive");
    assert_eq!(second.outcome, BatchOutcome::Failed);
    assert_eq!(second.imported, 0);
    assert_eq!(second.failed, 2);

    // 旧集合保持完好
    let records = env
        .ticket_api
        .list_records(WindowScope::Monthly)
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_id, "1001");
    assert_eq!(records[0].import_batch_id, first.batch_id);
}

// ==========================================
// 场景4: 重处理整体替换
// ==========================================

#[tokio::test]
async fn test_reprocess_replaces_whole_scope() {
    let env = TestEnv::new();

    env.derive_api
        .derive(
            vec![
                RawRowBuilder::new("1001").build(),
                RawRowBuilder::new("1002").build(),
            ],
            WindowScope::Monthly,
        )
        .await
        .expect("first derive");

    // 另一作用域不受影响
    env.derive_api
        .derive(
            vec![RawRowBuilder::new("3001").build()],
            WindowScope::Corrective,
        )
        .await
        .expect("corrective derive");

    env.derive_api
        .derive(vec![RawRowBuilder::new("2001").build()], WindowScope::Monthly)
        .await
        .expect("second derive");

    let monthly = env
        .ticket_api
        .list_records(WindowScope::Monthly)
        .expect("list monthly");
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].request_id, "2001");

    let corrective = env
        .ticket_api
        .list_records(WindowScope::Corrective)
        .expect("list corrective");
    assert_eq!(corrective.len(), 1);
}

// ==========================================
// 场景5: 未配置窗口 → 当前 ISO 周回退
// ==========================================

#[tokio::test]
async fn test_unconfigured_window_falls_back_to_current_iso_week() {
    let env = TestEnv::new();

    // 不保存任何窗口, 今天创建的工单必然落在当前 ISO 周内
    let response = env
        .derive_api
        .derive(vec![RawRowBuilder::new("1001").build()], WindowScope::Monthly)
        .await
        .expect("derive");
    assert_eq!(response.outcome, BatchOutcome::Success);

    let records = env
        .ticket_api
        .list_records(WindowScope::Monthly)
        .expect("list");
    assert!(records[0].in_date_range);
}

// ==========================================
// 场景6: 超链接工单号回退提取
// ==========================================

#[tokio::test]
async fn test_hyperlink_request_id_fallback() {
    let env = TestEnv::new();

    let rows = vec![RawRowBuilder::new("")
        .hyperlink_only("https://soporte.example.com/WorkOrder.do?woMode=viewWO&woID=48213")
        .build()];
    let response = env
        .derive_api
        .derive(rows, WindowScope::Monthly)
        .await
        .expect("derive");
    assert_eq!(response.outcome, BatchOutcome::Success);

    let record = env.ticket_api.get_record("48213").expect("get record");
    assert_eq!(record.request_id, "48213");
}

// ==========================================
// 场景7: 占位技术员归一化
// ==========================================

#[tokio::test]
async fn test_unassigned_technician_normalized_to_none() {
    let env = TestEnv::new();

    env.derive_api
        .derive(
            vec![RawRowBuilder::new("1001").technician("No asignado").build()],
            WindowScope::Monthly,
        )
        .await
        .expect("derive");

    let record = env.ticket_api.get_record("1001").expect("get");
    assert_eq!(record.technician, None);
}
