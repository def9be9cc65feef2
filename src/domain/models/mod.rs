// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抽取配置（extraction）：抽取策略以及协作方返回的原始抽取结果
/// - 抓取结果（lp_result）：规范化后的单条落地页记录
pub mod extraction;
pub mod lp_result;
