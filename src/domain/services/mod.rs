// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 策略选择（strategy_selector）：根据请求参数选择抽取策略
/// - 结果规范化（result_normalizer）：把协作方的原始输出解释为有界、已校验的结果列表
///
/// 两者都是纯函数，不做任何 I/O。
pub mod result_normalizer;
pub mod strategy_selector;
